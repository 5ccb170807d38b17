//! External collaborator seams: ledger read/write traits, the Solana
//! JSON-RPC client, and the shared retry helper

pub mod ledger;
pub mod retry;

pub use ledger::{
    LedgerReader, LedgerWriter, NotaryReceipt, RelayLedgerWriter, RpcLedgerClient, SignatureInfo,
    TransactionDetail,
};
pub use retry::retry_with_backoff;
