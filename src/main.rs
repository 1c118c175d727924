//! Custody Wallet CLI Application
//!
//! A command-line interface for the 2-of-3 custodial wallet: key
//! generation, wallet construction, offline approval signing, and
//! operation submission against a file-backed ledger.

use clap::{Parser, Subcommand};
use custody_wallet::cli::{self, AppState};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "custody")]
#[command(version = "0.1.0")]
#[command(about = "A 2-of-3 custodial authorization wallet", long_about = None)]
struct Cli {
    /// Data directory for wallet and ledger storage
    #[arg(short, long, default_value = ".custody_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh signer key pair
    Keygen,

    /// Initialize a wallet with exactly three signer identities
    Init {
        /// Signer identity (repeat exactly three times)
        #[arg(short, long = "signer", required = true)]
        signers: Vec<String>,

        /// Initial native balance credited to the vault
        #[arg(short, long, default_value = "0")]
        balance: u128,
    },

    /// Display wallet status
    Info,

    /// Check whether an identity is a registered signer
    IsSigner {
        /// Identity to check
        identity: String,
    },

    /// Print the next acceptable sequence id
    NextSequence,

    /// Produce an approval signature over an operation digest (offline)
    Sign {
        /// Approving signer's private key (hex)
        #[arg(long)]
        private_key: String,

        #[arg(short = 't', long)]
        destination: String,

        #[arg(short, long)]
        amount: u128,

        /// Payload bytes (hex) for a native transfer
        #[arg(short, long)]
        payload: Option<String>,

        /// Token reference; switches the digest to the token domain
        #[arg(long, conflicts_with = "payload")]
        token: Option<String>,

        /// Expiry deadline (RFC 3339, e.g. 2026-12-31T00:00:00Z)
        #[arg(short, long)]
        expiry: String,

        #[arg(short, long)]
        sequence_id: u64,
    },

    /// Submit a native value transfer with a co-signer's approval
    Submit {
        /// Submitting signer's identity
        #[arg(short, long)]
        caller: String,

        #[arg(short = 't', long)]
        destination: String,

        #[arg(short, long)]
        amount: u128,

        /// Payload bytes (hex)
        #[arg(short, long)]
        payload: Option<String>,

        /// Expiry deadline (RFC 3339)
        #[arg(short, long)]
        expiry: String,

        #[arg(short, long)]
        sequence_id: u64,

        /// Co-signer's 65-byte approval signature (hex)
        #[arg(long)]
        signature: String,
    },

    /// Submit a token transfer with a co-signer's approval
    SubmitToken {
        #[arg(short, long)]
        caller: String,

        #[arg(short = 't', long)]
        destination: String,

        #[arg(short, long)]
        amount: u128,

        /// Token reference
        #[arg(long)]
        token: String,

        /// Expiry deadline (RFC 3339)
        #[arg(short, long)]
        expiry: String,

        #[arg(short, long)]
        sequence_id: u64,

        /// Co-signer's 65-byte approval signature (hex)
        #[arg(long)]
        signature: String,
    },

    /// Irrevocably restrict destinations to registered signers
    ActivateSafeMode {
        /// Requesting signer's identity
        #[arg(short, long)]
        caller: String,
    },

    /// Record an incoming deposit
    Deposit {
        #[arg(short = 'f', long)]
        sender: String,

        #[arg(short, long)]
        amount: u128,

        /// Credit a token balance instead of native value
        #[arg(long)]
        token: Option<String>,

        /// Attached data (hex)
        #[arg(long)]
        data: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("❌ {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> cli::CliResult<()> {
    match cli.command {
        Commands::Keygen => cli::commands::cmd_keygen(),
        Commands::Init { signers, balance } => {
            cli::commands::cmd_init(&cli.data_dir, signers, balance)
        }
        Commands::Info => {
            let state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_info(&state)
        }
        Commands::IsSigner { identity } => {
            let state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_is_signer(&state, &identity)
        }
        Commands::NextSequence => {
            let state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_next_sequence(&state)
        }
        Commands::Sign {
            private_key,
            destination,
            amount,
            payload,
            token,
            expiry,
            sequence_id,
        } => cli::commands::cmd_sign(
            &private_key,
            &destination,
            amount,
            payload.as_deref(),
            token.as_deref(),
            &expiry,
            sequence_id,
        ),
        Commands::Submit {
            caller,
            destination,
            amount,
            payload,
            expiry,
            sequence_id,
            signature,
        } => {
            let mut state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_submit(
                &mut state,
                &caller,
                &destination,
                amount,
                payload.as_deref(),
                &expiry,
                sequence_id,
                &signature,
            )
        }
        Commands::SubmitToken {
            caller,
            destination,
            amount,
            token,
            expiry,
            sequence_id,
            signature,
        } => {
            let mut state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_submit_token(
                &mut state,
                &caller,
                &destination,
                amount,
                &token,
                &expiry,
                sequence_id,
                &signature,
            )
        }
        Commands::ActivateSafeMode { caller } => {
            let mut state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_activate_safe_mode(&mut state, &caller)
        }
        Commands::Deposit {
            sender,
            amount,
            token,
            data,
        } => {
            let mut state = AppState::load(&cli.data_dir)?;
            cli::commands::cmd_deposit(
                &mut state,
                &sender,
                amount,
                token.as_deref(),
                data.as_deref(),
            )
        }
    }
}
