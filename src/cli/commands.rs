//! CLI commands for the custody wallet
//!
//! Implements all command handlers for the CLI interface.

use crate::crypto::KeyPair;
use crate::custody::{EcdsaRecovery, Operation, Wallet};
use crate::host::MemoryHost;
use crate::storage::{StorageConfig, WalletStore};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub wallet: Wallet,
    pub ledger: MemoryHost,
    pub store: WalletStore,
}

impl AppState {
    /// Load wallet and ledger from the data directory
    pub fn load(data_dir: &Path) -> CliResult<Self> {
        let store = WalletStore::new(StorageConfig {
            data_dir: data_dir.to_path_buf(),
            ..Default::default()
        })?;

        if !store.wallet_exists() {
            return Err("No wallet found. Run: custody init --signer <A> --signer <B> --signer <C>".into());
        }

        let wallet = store.load_wallet()?;
        let ledger = store.load_ledger()?;

        Ok(Self {
            wallet,
            ledger,
            store,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.store.save_wallet(&self.wallet)?;
        self.store.save_ledger(&self.ledger)?;
        Ok(())
    }
}

/// Generate a fresh signer key pair
pub fn cmd_keygen() -> CliResult<()> {
    let key_pair = KeyPair::generate();

    println!("🔐 New signer key pair:");
    println!("   📍 Identity: {}", key_pair.address());
    println!("   🔑 Public key: {}", key_pair.public_key_hex());
    println!("   🗝️  Private key: {}", key_pair.private_key_hex());
    println!("\n   ⚠️  Keep the private key secret. The identity is what you register.");

    Ok(())
}

/// Initialize a new wallet with exactly three signer identities
pub fn cmd_init(data_dir: &Path, signers: Vec<String>, balance: u128) -> CliResult<()> {
    let store = WalletStore::new(StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    })?;

    if store.wallet_exists() {
        println!("⚠️  Wallet already exists at {:?}", data_dir);
        return Ok(());
    }

    let wallet = Wallet::new(signers)?;
    let mut ledger = MemoryHost::new("vault");
    if balance > 0 {
        ledger.credit("vault", balance);
    }

    store.save_wallet(&wallet)?;
    store.save_ledger(&ledger)?;

    println!("✅ Wallet initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    for signer in wallet.signers() {
        println!("   👤 Signer: {}", signer);
    }
    println!("   💰 Vault balance: {}", ledger.balance("vault"));

    Ok(())
}

/// Display wallet status
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    println!("🏦 Custody wallet");
    for signer in state.wallet.signers() {
        println!("   👤 Signer: {}", signer);
    }
    println!(
        "   🔒 Safe mode: {}",
        if state.wallet.safe_mode_active() {
            "ACTIVE (destinations restricted to signers)"
        } else {
            "inactive"
        }
    );
    println!("   🔢 Next sequence id: {}", state.wallet.next_sequence_id());
    println!("   💰 Vault balance: {}", state.ledger.balance("vault"));

    Ok(())
}

/// Check whether an identity is a registered signer
pub fn cmd_is_signer(state: &AppState, identity: &str) -> CliResult<()> {
    if state.wallet.is_signer(identity) {
        println!("✅ {} is a registered signer", identity);
    } else {
        println!("❌ {} is NOT a registered signer", identity);
    }
    Ok(())
}

/// Print the next acceptable sequence id
pub fn cmd_next_sequence(state: &AppState) -> CliResult<()> {
    println!("{}", state.wallet.next_sequence_id());
    Ok(())
}

/// Produce an approval signature over an operation digest (offline)
///
/// Run by the second signer; the printed signature travels to the
/// caller, who attaches it to the submission.
#[allow(clippy::too_many_arguments)]
pub fn cmd_sign(
    private_key: &str,
    destination: &str,
    amount: u128,
    payload: Option<&str>,
    token: Option<&str>,
    expiry: &str,
    sequence_id: u64,
) -> CliResult<()> {
    let key_pair = KeyPair::from_private_key_hex(private_key)?;
    let expiry = parse_expiry(expiry)?;

    let unsigned = match token {
        Some(token) => Operation::token(destination, amount, token, expiry, sequence_id, vec![]),
        None => Operation::transfer(
            destination,
            amount,
            decode_hex(payload)?,
            expiry,
            sequence_id,
            vec![],
        ),
    };

    let digest = unsigned.digest();
    let signature = key_pair.sign_recoverable(&digest);

    println!("✍️  Approval by {}", key_pair.address());
    println!("   #️⃣  Digest: {}", hex::encode(digest));
    println!("   📝 Signature: {}", hex::encode(signature));

    Ok(())
}

/// Submit a native value transfer with a co-signer's approval
#[allow(clippy::too_many_arguments)]
pub fn cmd_submit(
    state: &mut AppState,
    caller: &str,
    destination: &str,
    amount: u128,
    payload: Option<&str>,
    expiry: &str,
    sequence_id: u64,
    signature: &str,
) -> CliResult<()> {
    let expiry = parse_expiry(expiry)?;
    let record = state.wallet.submit_operation(
        caller,
        destination,
        amount,
        decode_hex(payload)?,
        expiry,
        sequence_id,
        hex::decode(signature)?,
        &mut state.ledger,
        &EcdsaRecovery,
    )?;
    state.save()?;

    println!("✅ Transfer executed");
    println!("   📤 {} -> {} ({} units)", record.caller, record.destination, record.amount);
    println!("   🤝 Approver: {}", record.approver);
    println!("   #️⃣  Digest: {}", record.digest);
    println!("   🔢 Next sequence id: {}", state.wallet.next_sequence_id());

    Ok(())
}

/// Submit a token transfer with a co-signer's approval
#[allow(clippy::too_many_arguments)]
pub fn cmd_submit_token(
    state: &mut AppState,
    caller: &str,
    destination: &str,
    amount: u128,
    token: &str,
    expiry: &str,
    sequence_id: u64,
    signature: &str,
) -> CliResult<()> {
    let expiry = parse_expiry(expiry)?;
    let record = state.wallet.submit_token_operation(
        caller,
        destination,
        amount,
        token,
        expiry,
        sequence_id,
        hex::decode(signature)?,
        &mut state.ledger,
        &EcdsaRecovery,
    )?;
    state.save()?;

    println!("✅ Token transfer executed");
    println!(
        "   📤 {} -> {} ({} of {})",
        record.caller, record.destination, record.amount, token
    );
    println!("   🤝 Approver: {}", record.approver);
    println!("   🔢 Next sequence id: {}", state.wallet.next_sequence_id());

    Ok(())
}

/// Trip the irrevocable safe-mode latch
pub fn cmd_activate_safe_mode(state: &mut AppState, caller: &str) -> CliResult<()> {
    let record = state.wallet.activate_safe_mode(caller)?;
    state.save()?;

    println!("🔒 Safe mode activated by {}", record.caller);
    println!("   All destinations are now restricted to registered signers.");
    println!("   This cannot be undone.");

    Ok(())
}

/// Record an incoming deposit
pub fn cmd_deposit(
    state: &mut AppState,
    sender: &str,
    amount: u128,
    token: Option<&str>,
    data: Option<&str>,
) -> CliResult<()> {
    match token {
        Some(token) => state.ledger.credit_token(token, "vault", amount),
        None => state.ledger.credit("vault", amount),
    }

    match state.wallet.observe_deposit(sender, amount, decode_hex(data)?) {
        Some(record) => {
            println!("📥 Deposit of {} from {}", record.amount, record.sender)
        }
        None => println!("📭 Zero-amount deposit ignored"),
    }
    state.save()?;

    Ok(())
}

fn parse_expiry(expiry: &str) -> CliResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(expiry)?.with_timezone(&Utc))
}

fn decode_hex(value: Option<&str>) -> CliResult<Vec<u8>> {
    Ok(match value {
        Some(v) => hex::decode(v)?,
        None => Vec::new(),
    })
}
