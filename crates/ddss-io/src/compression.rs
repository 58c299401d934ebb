use std::io::Read;

use crate::error::IoOpenError;

/// Which streaming decompressor, if any, wraps the byte source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionHint {
    Zstd,
    Gzip,
    None_,
}

impl CompressionHint {
    /// Detect compression from a filename or URI suffix: `.zst`, `.gz`, else
    /// uncompressed.
    pub fn detect(name: &str) -> Self {
        if name.ends_with(".zst") {
            CompressionHint::Zstd
        } else if name.ends_with(".gz") {
            CompressionHint::Gzip
        } else {
            CompressionHint::None_
        }
    }

    /// Parse an explicit `-c/--compression` flag value.
    pub fn parse(raw: &str) -> Result<Self, IoOpenError> {
        match raw {
            "zst" | "zstd" => Ok(CompressionHint::Zstd),
            "gz" | "gzip" => Ok(CompressionHint::Gzip),
            "none" => Ok(CompressionHint::None_),
            other => Err(IoOpenError::Io(std::io::Error::other(format!(
                "unrecognized compression hint: {other}"
            )))),
        }
    }
}

/// Open `source` (a filesystem path, or `-` for stdin) and wrap it in the
/// decompressor implied by `hint`, or by suffix detection when `hint` is
/// `None`. Never buffers the whole payload in memory.
pub fn open_input(source: &str, hint: Option<CompressionHint>) -> Result<Box<dyn Read>, IoOpenError> {
    let raw: Box<dyn Read> = if source == "-" {
        Box::new(std::io::stdin())
    } else {
        let file = std::fs::File::open(source).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IoOpenError::NotFound(source.to_string())
            } else {
                IoOpenError::Io(e)
            }
        })?;
        Box::new(file)
    };

    let hint = hint.unwrap_or_else(|| CompressionHint::detect(source));
    log::debug!("opening {source} with compression hint {hint:?}");
    wrap_decompressor(raw, hint)
}

fn wrap_decompressor(raw: Box<dyn Read>, hint: CompressionHint) -> Result<Box<dyn Read>, IoOpenError> {
    match hint {
        CompressionHint::Zstd => Ok(Box::new(zstd::stream::read::Decoder::new(raw)?)),
        CompressionHint::Gzip => Ok(Box::new(flate2::read::GzDecoder::new(raw))),
        CompressionHint::None_ => Ok(raw),
    }
}
