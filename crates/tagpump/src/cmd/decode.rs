use tagpump_codec::decode_all;

use crate::cmd::DecodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::input::read_bytes;
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = read_bytes(&args.input)?;
    let rows: Vec<_> = decode_all(&bytes).collect();

    let silent = rows.iter().filter(|(_, decoded)| decoded.is_none()).count();
    tracing::info!(bytes = rows.len(), silent, "decoded input");

    print_decoded(&rows, format);
    Ok(SUCCESS)
}
