use std::io::Read;

use bytes::Bytes;
use tagpump_io::{BufSource, ReadSource, Source};

use crate::cmd::InputArgs;
use crate::exit::{io_error, source_error, CliError, CliResult, USAGE};

/// Collect the whole input up front (for batch decoding).
pub fn read_bytes(input: &InputArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &input.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &input.file {
        return std::fs::read(path)
            .map_err(|err| io_error(&format!("read failed ({})", path.display()), err));
    }

    let mut buf = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut buf)
        .map_err(|err| io_error("stdin read failed", err))?;
    Ok(buf)
}

/// Open the input as a byte source pulled lazily by a pump.
pub fn open_source(input: &InputArgs) -> CliResult<Box<dyn Source>> {
    if let Some(hex) = &input.hex {
        return Ok(Box::new(BufSource::new(Bytes::from(parse_hex(hex)?))));
    }
    if let Some(path) = &input.file {
        let source = ReadSource::open(path).map_err(|err| source_error("open failed", err))?;
        return Ok(Box::new(source));
    }
    Ok(Box::new(ReadSource::new(std::io::stdin())))
}

/// Parse hex byte text: `"00 7f"`, `"007f"`, `"0x00,0x7F"`.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let mut digits = String::with_capacity(input.len());
    for token in input.split(|c: char| c.is_whitespace() || c == ',') {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if token.len() % 2 != 0 && token.len() > 1 {
            return Err(CliError::new(
                USAGE,
                format!("odd number of hex digits in {token:?}"),
            ));
        }
        if token.len() == 1 {
            digits.push('0');
        }
        digits.push_str(token);
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CliError::new(USAGE, format!("invalid hex input: {input}")))
        })
        .collect()
}
