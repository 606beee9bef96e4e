use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wbxml_codec::{encode_document, CodecConfig, Decoder, Schema, TagTable};

use crate::json;
use crate::render;

#[derive(Parser, Debug)]
#[command(name = "wbxml", version, about = "Dump and encode WBXML documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a binary document and print it as an indented tree.
    Dump {
        file: PathBuf,
        /// Input is hex text rather than raw bytes.
        #[arg(long, default_value_t = false)]
        hex: bool,
        /// Print the JSON element form instead of the tree.
        #[arg(long, default_value_t = false)]
        json: bool,
        /// TOML tag schema; the built-in ActiveSync pages are used otherwise.
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Encode a JSON element tree.
    Encode {
        json: PathBuf,
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Write raw bytes here instead of printing hex to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Dump { file, hex, json, schema } => {
            let (table, config) = load_registry(schema.as_deref())?;
            let bytes = read_input(&file, hex)?;
            println!("{}", dump(&table, config, &bytes, json)?.trim_end());
            Ok(())
        }
        Command::Encode { json, schema, out } => {
            let (table, config) = load_registry(schema.as_deref())?;
            let input = fs::read_to_string(&json)
                .with_context(|| format!("failed to read {}", json.display()))?;
            let bytes = encode(&table, &config, &input)?;
            match out {
                Some(path) => {
                    fs::write(&path, &bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => println!("{}", hex::encode(&bytes)),
            }
            Ok(())
        }
    }
}

/// Loads the tag table and codec settings from `schema`, or falls back to
/// the built-in ActiveSync pages with default settings.
pub fn load_registry(schema: Option<&Path>) -> Result<(TagTable, CodecConfig)> {
    match schema {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read schema {}", path.display()))?;
            let schema = Schema::from_toml_str(&text)
                .with_context(|| format!("invalid schema {}", path.display()))?;
            let table = schema.registry()?;
            Ok((table, schema.codec))
        }
        None => Ok((wbxml_eas::registry()?, CodecConfig::default())),
    }
}

fn read_input(path: &Path, hex_text: bool) -> Result<Vec<u8>> {
    if !hex_text {
        return fs::read(path).with_context(|| format!("failed to read {}", path.display()));
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    decode_hex(&text)
}

/// Decodes hex text, ignoring whitespace between digits.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    hex::decode(digits).context("input is not valid hex")
}

pub fn dump(table: &TagTable, config: CodecConfig, bytes: &[u8], as_json: bool) -> Result<String> {
    let decoder = Decoder::with_config(table, config);
    if let Some(preamble) = decoder.preamble(bytes)? {
        log::debug!(
            "preamble: version {:#04x} public id {} charset {:#x}",
            preamble.version,
            preamble.public_id,
            preamble.charset
        );
    }
    let elements = decoder.decode_tree(bytes).context("failed to decode document")?;
    if as_json {
        json::to_json(&elements)
    } else {
        Ok(render::render_tree(&elements))
    }
}

pub fn encode(table: &TagTable, config: &CodecConfig, input: &str) -> Result<Vec<u8>> {
    let elements = json::parse_document(input)?;
    let bytes = encode_document(table, config, &elements).context("failed to encode document")?;
    log::debug!("encoded {} element(s) into {} bytes", elements.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_input_ignores_whitespace() {
        assert_eq!(decode_hex("03 01\n6a 00\n").expect("valid"), vec![0x03, 0x01, 0x6A, 0x00]);
        assert!(decode_hex("03 0").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["wbxml", "dump", "doc.bin", "--hex"]).expect("dump");
        assert!(matches!(cli.command, Command::Dump { hex: true, json: false, schema: None, .. }));

        let cli = Cli::try_parse_from(["wbxml", "encode", "doc.json", "--out", "doc.bin"])
            .expect("encode");
        match cli.command {
            Command::Encode { out, schema, .. } => {
                assert_eq!(out, Some(PathBuf::from("doc.bin")));
                assert!(schema.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn json_dump_re_encodes_to_the_same_bytes() {
        let (table, config) = load_registry(None).expect("built-in pages");
        // Ping { Folders (content flag, nothing inside) Status/ }
        let bytes = vec![0x03, 0x01, 0x6A, 0x00, 0x00, 0x0D, 0x45, 0x49, 0x01, 0x07, 0x01];
        let json = dump(&table, config.clone(), &bytes, true).expect("dumps");
        assert!(json.contains("\"children\": []"));
        assert_eq!(encode(&table, &config, &json).expect("encodes"), bytes);
    }

    #[test]
    fn encode_then_dump_uses_builtin_pages() {
        let (table, config) = load_registry(None).expect("built-in pages");
        let bytes = encode(
            &table,
            &config,
            r#"{"tag": "Ping:Ping", "children": [{"tag": "Ping:HeartbeatInterval", "text": "480"}]}"#,
        )
        .expect("encodes");
        assert_eq!(&bytes[..7], &[0x03, 0x01, 0x6A, 0x00, 0x00, 0x0D, 0x45]);

        let tree = dump(&table, config, &bytes, false).expect("dumps");
        assert_eq!(tree, "<Ping:Ping>\n  <Ping:HeartbeatInterval>480</Ping:HeartbeatInterval>\n</Ping:Ping>\n");
    }
}
