//! Reads RDF files into quad streams and writes quads back out, using oxigraph's
//! parsers and serializers.

use crate::term::{to_oxigraph_quad, Quad};
use anyhow::{anyhow, Error, Result};
use log::{debug, info, warn};
use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Guesses the RDF format of a file from its extension, defaulting to Turtle.
pub fn format_from_path(file: &Path) -> RdfFormat {
    let content_type = file.extension().and_then(|ext| ext.to_str());
    let content_type = content_type.and_then(|ext| match ext {
        "ttl" => Some(RdfFormat::Turtle),
        "xml" | "rdf" => Some(RdfFormat::RdfXml),
        "n3" => Some(RdfFormat::N3),
        "nt" => Some(RdfFormat::NTriples),
        "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        _ => None,
    });
    content_type.unwrap_or(RdfFormat::Turtle)
}

/// Parses a format name as accepted on the command line.
pub fn format_from_name(name: &str) -> Result<RdfFormat> {
    match name.to_ascii_lowercase().as_str() {
        "turtle" | "ttl" => Ok(RdfFormat::Turtle),
        "ntriples" | "nt" => Ok(RdfFormat::NTriples),
        "nquads" | "nq" => Ok(RdfFormat::NQuads),
        "trig" => Ok(RdfFormat::TriG),
        "rdfxml" | "xml" => Ok(RdfFormat::RdfXml),
        other => Err(anyhow!("Unsupported RDF format: {}", other)),
    }
}

/// Lazily parses quads from a reader.
///
/// The returned iterator can be handed straight to
/// [`RdfObjectLoader::import`](crate::loader::RdfObjectLoader::import); a syntax
/// error surfaces as the failing item.
pub fn quads_from_reader<R: Read>(
    reader: R,
    format: RdfFormat,
) -> impl Iterator<Item = Result<Quad>> {
    RdfParser::from_format(format)
        .for_reader(reader)
        .map(|quad| quad.map(Quad::from).map_err(Error::from))
}

/// Opens a file and lazily parses its quads, guessing the format from the extension.
pub fn open_quads(file: &Path) -> Result<impl Iterator<Item = Result<Quad>>> {
    debug!("Reading file: {}", file.display());
    let format = format_from_path(file);
    let reader = BufReader::new(File::open(file)?);
    Ok(quads_from_reader(reader, format))
}

/// Reads all quads of a file.
pub fn read_quads(file: &Path) -> Result<Vec<Quad>> {
    open_quads(file)?.collect()
}

/// Writes quads in the given format and returns how many were written.
///
/// Quads oxigraph cannot represent, such as literals in subject position, are
/// skipped with a warning.
pub fn write_quads<W: Write>(quads: &[Quad], writer: W, format: RdfFormat) -> Result<usize> {
    let mut serializer = RdfSerializer::from_format(format).for_writer(writer);
    let mut written = 0;
    for quad in quads {
        match to_oxigraph_quad(quad) {
            Ok(quad) => {
                serializer.serialize_quad(&quad)?;
                written += 1;
            }
            Err(err) => warn!("Skipping quad {:?}: {}", quad, err),
        }
    }
    serializer.finish()?;
    Ok(written)
}

/// Writes quads to a file, choosing the format from its extension.
pub fn write_quads_to_file(quads: &[Quad], file: &Path) -> Result<usize> {
    info!(
        "Writing {} quads to file: {}",
        quads.len(),
        file.display()
    );
    let format = format_from_path(file);
    let file = File::create(file)?;
    write_quads(quads, file, format)
}
