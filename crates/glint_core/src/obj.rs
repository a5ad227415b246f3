//! OBJ subset loader.
//!
//! Consumes `v`, `f` and `s` lines; every other directive is ignored.
//! Faces are triangles with plain 1-based vertex indices. Slash-delimited
//! `v/vt/vn` tokens, out-of-range indices and malformed numbers are hard
//! errors surfaced to the caller.

use glint_math::Vec3;
use thiserror::Error;

use crate::{Mesh, Shading};

/// Byte-reading callback used by the loader. The host supplies the real
/// implementation; [`DiskIo`] covers the plain-filesystem case.
pub trait Io {
    fn read_file(&mut self, path: &str) -> std::io::Result<Vec<u8>>;
}

/// Reads straight from the local filesystem.
pub struct DiskIo;

impl Io for DiskIo {
    fn read_file(&mut self, path: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Errors that can occur while loading a mesh.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid `{directive}` component {token:?}")]
    Parse {
        line: usize,
        directive: char,
        token: String,
    },

    #[error("line {line}: missing `{directive}` component")]
    MissingComponent { line: usize, directive: char },

    #[error("line {line}: face index {index} out of range ({vertex_count} vertices)")]
    FaceIndex {
        line: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load an OBJ file through `io` and build the mesh's BVH.
pub fn load_mesh(io: &mut dyn Io, path: &str) -> LoadResult<Mesh> {
    let data = io.read_file(path)?;
    let text = String::from_utf8_lossy(&data);

    let mut mesh = Mesh::new();

    for (number, raw_line) in text.split('\n').enumerate() {
        let line = number + 1;
        let mut tokens = raw_line.trim_end_matches('\r').split(' ');

        match tokens.next() {
            Some("v") => {
                let x = parse_float(&mut tokens, line)?;
                let y = parse_float(&mut tokens, line)?;
                let z = parse_float(&mut tokens, line)?;
                mesh.vertices.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let a = parse_face_index(&mut tokens, line, mesh.vertices.len())?;
                let b = parse_face_index(&mut tokens, line, mesh.vertices.len())?;
                let c = parse_face_index(&mut tokens, line, mesh.vertices.len())?;
                mesh.faces.push([a, b, c]);
            }
            Some("s") => {
                let token = next_token(&mut tokens, line, 's')?;
                let group: u32 = token.parse().map_err(|_| LoadError::Parse {
                    line,
                    directive: 's',
                    token: token.to_string(),
                })?;
                mesh.shading = if group != 0 {
                    Shading::Smooth
                } else {
                    Shading::Flat
                };
            }
            _ => {}
        }
    }

    mesh.compute_bvh();

    log::info!(
        "loaded {}: {} vertices, {} faces, {:?} shading",
        path,
        mesh.vertices.len(),
        mesh.faces.len(),
        mesh.shading
    );

    Ok(mesh)
}

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    directive: char,
) -> LoadResult<&'a str> {
    tokens
        .next()
        .ok_or(LoadError::MissingComponent { line, directive })
}

fn parse_float<'a>(tokens: &mut impl Iterator<Item = &'a str>, line: usize) -> LoadResult<f32> {
    let token = next_token(tokens, line, 'v')?;
    token.parse().map_err(|_| LoadError::Parse {
        line,
        directive: 'v',
        token: token.to_string(),
    })
}

/// Parse a 1-based face index and validate it against the vertices seen so
/// far. Rejecting here keeps BVH construction infallible.
fn parse_face_index<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    vertex_count: usize,
) -> LoadResult<usize> {
    let token = next_token(tokens, line, 'f')?;
    let index: usize = token.parse().map_err(|_| LoadError::Parse {
        line,
        directive: 'f',
        token: token.to_string(),
    })?;

    if index == 0 || index > vertex_count {
        return Err(LoadError::FaceIndex {
            line,
            index,
            vertex_count,
        });
    }

    Ok(index - 1)
}
