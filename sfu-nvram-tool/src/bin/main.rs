use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};
use sfu_nvram_tool::{
    report,
    Dump,
    IdentityPatch,
    Inspection,
    MacAddress,
    NvramRecord,
    SerialNumber,
};

#[derive(Parser)]
#[command(name = "sfu-nvram-tool", version)]
#[command(about = "UBNT_SFU NVRAM inspector and serial number patcher", long_about = None)]
#[command(after_help = "Examples:
  sfu-nvram-tool info mtdblock3.BIN
  sfu-nvram-tool patch mtdblock3.BIN mtdblock3_new.BIN --serial 48:57:54:43:30:30:30:30
  sfu-nvram-tool patch mtdblock3.BIN mtdblock3_new.BIN --serial 48:57:54:43:30:30:30:30 --mac 11:22:33:44:55:66")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every field of the NVRAM record of a dump
    Info {
        /// Input dump file path
        input: PathBuf,

        /// Also export the fields to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Write a copy of a dump with a new serial number and, optionally, base MAC address
    Patch {
        /// Input dump file path
        input: PathBuf,

        /// Output dump file path
        output: PathBuf,

        /// Serial number, 16 hex digits (e.g. 48:57:54:43:30:30:30:30)
        #[arg(short, long, value_parser = parse_serial)]
        serial: SerialNumber,

        /// Base MAC address, 12 hex digits (e.g. 11:22:33:44:55:66)
        #[arg(short, long, value_parser = parse_mac)]
        mac: Option<MacAddress>,
    },
}

fn parse_serial(s: &str) -> Result<SerialNumber, String> {
    s.parse().map_err(|e: sfu_nvram::Error| e.to_string())
}

fn parse_mac(s: &str) -> Result<MacAddress, String> {
    s.parse().map_err(|e: sfu_nvram::Error| e.to_string())
}

fn print_inspection(name: &str, inspection: &Inspection) {
    println!("Hashsum of {} (sha256): {}", name, inspection.sha256);
    print_record(&inspection.record);
}

fn print_record(record: &NvramRecord) {
    for line in report::field_lines(record) {
        println!("  {line}");
    }
    if let Err(e) = record.verify_checksum() {
        println!("Warning: {e}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, csv } => {
            println!("Reading dump: {}", input.display());
            let dump = Dump::from_file(&input)?;
            let inspection = Inspection::of(&dump)?;
            print_inspection(&input.display().to_string(), &inspection);

            if let Some(csv) = csv {
                report::write_csv(&inspection.record, &csv)?;
                println!("Exported fields to: {}", csv.display());
            }

            inspection.record.check_sentinel()?;
            Ok(())
        }
        Commands::Patch {
            input,
            output,
            serial,
            mac,
        } => {
            println!("Reading dump: {}", input.display());
            let dump = Dump::from_file(&input)?;
            print_inspection(&input.display().to_string(), &Inspection::of(&dump)?);

            let patch = IdentityPatch::new(serial, mac);
            let patched = sfu_nvram_tool::reidentify(&dump, &output, &patch)?;
            print_inspection(&output.display().to_string(), &patched);

            println!("Successfully wrote patched dump: {}", output.display());
            Ok(())
        }
    }
}
