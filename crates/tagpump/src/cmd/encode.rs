use tagpump_codec::{encode, Decoded};

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = encode_tokens(&args.tokens)?;
    print_encoded(&args.tokens, &bytes, format);
    Ok(SUCCESS)
}

fn encode_tokens(tokens: &[String]) -> CliResult<Vec<u8>> {
    tokens
        .iter()
        .map(|token| {
            let value: Decoded = token
                .parse()
                .map_err(|err| codec_error("invalid value", err))?;
            encode(value).map_err(|err| codec_error("encode failed", err))
        })
        .collect()
}
