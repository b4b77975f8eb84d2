use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tagpump_codec::{Decoded, EncodedByte};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ByteOutput {
    schema_id: &'static str,
    offset: usize,
    byte: String,
    tag: &'static str,
    data: u8,
    output: Option<String>,
}

impl ByteOutput {
    fn new(offset: usize, byte: EncodedByte, decoded: Option<Decoded>) -> Self {
        Self {
            schema_id: "https://schemas.3leaps.dev/tagpump/cli/v1/decoded-byte.schema.json",
            offset,
            byte: hex_byte(byte.raw()),
            tag: byte.tag().name(),
            data: byte.data(),
            output: decoded.map(|value| value.to_string()),
        }
    }
}

#[derive(Serialize)]
struct FragmentOutput<'a> {
    schema_id: &'a str,
    index: usize,
    text: &'a str,
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    schema_id: &'a str,
    tokens: &'a [String],
    bytes: Vec<String>,
}

/// Print a batch of decoded bytes.
pub fn print_decoded(rows: &[(EncodedByte, Option<Decoded>)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for (offset, (byte, decoded)) in rows.iter().enumerate() {
                print_json(&ByteOutput::new(offset, *byte, *decoded));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "BYTE", "TAG", "DATA", "OUTPUT"]);
            for (offset, (byte, decoded)) in rows.iter().enumerate() {
                let row = ByteOutput::new(offset, *byte, *decoded);
                table.add_row(vec![
                    row.offset.to_string(),
                    row.byte,
                    row.tag.to_string(),
                    row.data.to_string(),
                    row.output.unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (offset, (byte, decoded)) in rows.iter().enumerate() {
                let row = ByteOutput::new(offset, *byte, *decoded);
                println!(
                    "offset={} byte={} tag={} data={} output={}",
                    row.offset,
                    row.byte,
                    row.tag,
                    row.data,
                    row.output.as_deref().unwrap_or("-")
                );
            }
        }
        OutputFormat::Raw => {
            for decoded in rows.iter().filter_map(|(_, decoded)| *decoded) {
                println!("{decoded}");
            }
        }
    }
}

/// Print one fragment produced by a running pump.
pub fn print_fragment(index: usize, text: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&FragmentOutput {
            schema_id: "https://schemas.3leaps.dev/tagpump/cli/v1/fragment.schema.json",
            index,
            text,
        }),
        OutputFormat::Table => {
            // Streamed: header once, before the first fragment.
            if index == 0 {
                println!("{}", fragment_row("INDEX", "TEXT"));
            }
            println!("{}", fragment_row(index, text));
        }
        OutputFormat::Pretty => println!("index={index} text={text}"),
        OutputFormat::Raw => println!("{text}"),
    }
}

/// Print the bytes produced by `encode`.
pub fn print_encoded(tokens: &[String], bytes: &[u8], format: OutputFormat) {
    let hex: Vec<String> = bytes.iter().copied().map(hex_byte).collect();
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            schema_id: "https://schemas.3leaps.dev/tagpump/cli/v1/encoded.schema.json",
            tokens,
            bytes: hex,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TOKEN", "BYTE"]);
            for (token, byte) in tokens.iter().zip(&hex) {
                table.add_row(vec![token.clone(), byte.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", hex.join(" ")),
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn fragment_row(index: impl std::fmt::Display, text: &str) -> String {
    format!("{index:<6} {text}")
}

fn hex_byte(byte: u8) -> String {
    format!("{byte:#04x}")
}
