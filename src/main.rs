//! exif-ifd - Dump the IFD structure of an EXIF block.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_ifd::{
    BoxError, Config, ExifError, ExifHeader, IfdEnumerate, OutputFormat, TagType, TagVisitor,
    ValueContext, IFD_STANDARD,
};

/// Longest value shown in full by the tag listing.
const MAX_VALUE_DUMP_BYTES: usize = 32;

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let data = match std::fs::read(&config.input) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, data) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "exif_ifd=debug" } else { "exif_ifd=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(config: &Config, data: Vec<u8>) -> Result<(), ExifError> {
    let header = ExifHeader::parse(&data)?;
    let byte_order = config.byte_order.resolve(header.byte_order);

    debug!(
        byte_order = byte_order.mark(),
        top_offset = header.top_offset,
        "Root IFD at offset 0x{:04x}",
        header.root_ifd_offset
    );

    let enumerate = IfdEnumerate::new(data, byte_order)
        .with_top_offset(header.top_offset)
        .with_max_directories(config.max_directories);

    match config.format {
        OutputFormat::Tree => {
            let tree = enumerate.collect(header.root_ifd_offset)?;
            tree.print_tree();
        }
        OutputFormat::Tags => {
            let mut printer = TagPrinter::default();
            enumerate
                .scan(IFD_STANDARD, header.root_ifd_offset, Some(&mut printer))?;
            println!();
            println!("Total: {} tag(s)", printer.count);
        }
        OutputFormat::Json => {
            let tree = enumerate.collect(header.root_ifd_offset)?;
            let json = serde_json::json!({
                "header": header,
                "ifds": tree.ifds(),
            });
            let text = serde_json::to_string_pretty(&json)?;
            println!("{}", text);
        }
    }

    Ok(())
}

/// Prints one line per visited tag.
#[derive(Default)]
struct TagPrinter {
    count: usize,
}

impl TagVisitor for TagPrinter {
    fn visit(
        &mut self,
        indexed_ifd_name: &str,
        tag_id: u16,
        tag_type: TagType,
        value_context: &ValueContext,
    ) -> Result<(), BoxError> {
        self.count += 1;

        // A value we can't locate is still worth listing
        let value = match value_context.locate(tag_type) {
            Ok(bytes) if bytes.len() > MAX_VALUE_DUMP_BYTES => format!(
                "{}... ({} bytes)",
                hex::encode(&bytes[..MAX_VALUE_DUMP_BYTES]),
                bytes.len()
            ),
            Ok(bytes) => hex::encode(&bytes),
            Err(e) => format!("<{}>", e),
        };

        println!(
            "{:<8} 0x{:04x} {:<9} count={:<6} {}",
            indexed_ifd_name,
            tag_id,
            tag_type.name(),
            value_context.unit_count,
            value
        );

        Ok(())
    }
}
