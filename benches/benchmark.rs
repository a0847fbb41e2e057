use std::time::Instant;
use glam::Vec3;
use stlvertex::config::Config;
use stlvertex::export::write_stl;
use stlvertex::geometry::Triangle;
use stlvertex::processor::convert;

fn main() {
    let config = Config::default();

    let grid_size = 400;
    let gap = 0.5;

    println!("Generating {}x{} grid of triangles...", grid_size, grid_size);
    let mut triangles = Vec::with_capacity(grid_size * grid_size * 2);
    for y in 0..grid_size {
        for x in 0..grid_size {
            let p = Vec3::new(x as f32 * gap, y as f32 * gap, 0.0);
            let dx = Vec3::new(gap, 0.0, 0.0);
            let dy = Vec3::new(0.0, gap, 0.0);
            triangles.push(Triangle::new(p, p + dx, p + dy));
            triangles.push(Triangle::new(p + dx, p + dx + dy, p + dy));
        }
    }

    let mut stl = Vec::new();
    write_stl(&mut stl, &triangles).unwrap();
    println!("Encoded {} triangles ({} bytes)", triangles.len(), stl.len());

    let mut output = Vec::with_capacity(4 + triangles.len() * 72);
    let start = Instant::now();
    let stats = convert(stl.as_slice(), &mut output, &config).unwrap();
    println!(
        "Conversion took: {:.2?} ({} vertices, {} bytes)",
        start.elapsed(),
        stats.vertices,
        stats.bytes_written
    );
}
