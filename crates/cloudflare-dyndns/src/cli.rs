//! Command-line interface definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Update your Cloudflare DNS records with the current or specified IP address.
///
/// Examples:
///   cloudflare-dyndns list
///   cloudflare-dyndns update
///   cloudflare-dyndns update --name my-record --ip 1.2.3.4
#[derive(Parser, Debug)]
#[command(name = "cloudflare-dyndns", version, about, verbatim_doc_comment)]
pub struct Cli {
    /// Config file (default searches for ./.cloudflare-dyndns, ~/.cloudflare-dyndns,
    /// or ~/.config/cloudflare-dyndns/.cloudflare-dyndns)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Display the A and AAAA records of your Cloudflare zone
    List,

    /// Update your IP address in Cloudflare
    Update(UpdateArgs),

    /// Print your public IP address
    Ip,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Name of the DNS record to update (defaults to the configured records)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Point the records at this address instead of the current public IP
    #[arg(short = 'i', long)]
    pub ip: Option<String>,

    /// Comment for updated records (defaults to "Updated <UTC timestamp>")
    #[arg(short = 'c', long)]
    pub comment: Option<String>,

    /// Keep updating the remaining records after a failed update
    #[arg(long)]
    pub keep_going: bool,
}
