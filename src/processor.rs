use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::export::VertexWriter;
use crate::parser::{StlReader, PREAMBLE_LEN, RECORD_LEN};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Counters for one conversion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Source triangles read.
    pub triangles: u32,
    /// Vertex count written to the header.
    pub vertices: u32,
    pub bytes_written: u64,
}

/// Result of converting one file on disk.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: ConvertStats,
}

/// Outcome for one path handed to [`convert_files`].
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ConvertReport>,
}

/// Run the STL to vertex pass from `reader` into `writer`.
///
/// Every record is read in full before any of its output is written, so a
/// truncated source never leaves a partial record behind. Records completed
/// before the failure are flushed when the writer is dropped.
pub fn convert<R: Read, W: Write>(reader: R, writer: W, config: &Config) -> Result<ConvertStats> {
    let mut stl = StlReader::new(reader)?.discard_attributes();
    let mut out = VertexWriter::new(writer, config.effective_buffer_capacity());

    let triangles = stl.triangle_count();
    let vertices = out.write_header(triangles)?;
    log::debug!("{} triangles -> {} vertices", triangles, vertices);

    while let Some(tri) = stl.next_triangle()? {
        out.write_fan(&tri)?;
    }

    let bytes_written = out.finish()?;
    Ok(ConvertStats {
        triangles,
        vertices,
        bytes_written,
    })
}

/// Sibling path with the configured extension in place of the source's.
pub fn output_path(input: &Path, config: &Config) -> PathBuf {
    input.with_extension(&config.extension)
}

/// Convert one file, writing next to it.
///
/// Both handles are owned by this call and closed when it returns, on the
/// error path too.
pub fn convert_file(input: &Path, config: &Config) -> Result<ConvertReport> {
    let output = output_path(input, config);
    if same_file(input, &output) {
        return Err(ConvertError::SameFile { path: output });
    }

    let mut source = File::open(input).map_err(|source| ConvertError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    if config.strict {
        check_length(&mut source, input)?;
    }

    let destination = File::create(&output).map_err(|source| ConvertError::Io {
        path: output.clone(),
        source,
    })?;

    let reader = BufReader::with_capacity(config.effective_buffer_capacity(), source);
    let stats = convert(reader, destination, config)?;

    log::debug!(
        "{} -> {} ({} bytes)",
        input.display(),
        output.display(),
        stats.bytes_written
    );

    Ok(ConvertReport {
        input: input.to_path_buf(),
        output,
        stats,
    })
}

/// True when writing `output` would clobber `input`, including through
/// links or `..` components when both already exist.
fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Make sure the file can hold the records its header declares.
fn check_length(source: &mut File, input: &Path) -> Result<()> {
    let actual = source
        .metadata()
        .map_err(|source| ConvertError::Io {
            path: input.to_path_buf(),
            source,
        })?
        .len();

    // Too short for a preamble: the regular pass reports where it ends.
    if actual < PREAMBLE_LEN {
        return Ok(());
    }

    let mut preamble = [0u8; PREAMBLE_LEN as usize];
    source.read_exact(&mut preamble).map_err(ConvertError::Read)?;
    source.rewind().map_err(ConvertError::Read)?;

    let declared = u32::from_le_bytes([preamble[80], preamble[81], preamble[82], preamble[83]]);
    let expected = PREAMBLE_LEN + u64::from(declared) * RECORD_LEN;
    if actual < expected {
        return Err(ConvertError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Convert each path independently.
///
/// Results come back in argument order. On native targets the files are
/// spread over the rayon pool when `config.parallel` is set. An input whose
/// output path was already claimed by an earlier argument is not converted.
pub fn convert_files<P: AsRef<Path> + Sync>(inputs: &[P], config: &Config) -> Vec<FileOutcome> {
    let owners = output_owners(inputs, config);

    let process = |(index, input): (usize, &P)| {
        let input = input.as_ref();
        let result = match &owners[index] {
            Some(first) => Err(ConvertError::OutputCollision {
                output: output_path(input, config),
                first: first.clone(),
            }),
            None => convert_file(input, config),
        };
        FileOutcome {
            input: input.to_path_buf(),
            result,
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    {
        if config.parallel && inputs.len() > 1 {
            return inputs.par_iter().enumerate().map(process).collect();
        }
    }

    inputs.iter().enumerate().map(process).collect()
}

/// For each input, the earlier input that already owns its output path.
fn output_owners<P: AsRef<Path>>(inputs: &[P], config: &Config) -> Vec<Option<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    inputs
        .iter()
        .map(|input| {
            let input = input.as_ref();
            let output = output_path(input, config);
            let key = match output.parent().map(fs::canonicalize) {
                Some(Ok(dir)) => dir.join(output.file_name().unwrap_or_default()),
                _ => output,
            };
            match claimed.get(&key) {
                Some(first) => Some(first.to_path_buf()),
                None => {
                    claimed.insert(key, input);
                    None
                }
            }
        })
        .collect()
}
