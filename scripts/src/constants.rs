//! Constants used in the token scripts

/// Decimals of the generated token
pub const TOKEN_DECIMALS: u8 = 9;

/// Solidity file name used inside the standard-json compiler input
pub const SOURCE_UNIT_NAME: &str = "Token.sol";

/// Directory holding generated sources and per-token deployment folders
pub const CONTRACTS_DIR: &str = "contracts";

/// Deployment record written at the working directory root
pub const ROOT_DEPLOYMENT_FILE: &str = "deployment.json";

/// Name of the deployment record inside a per-token folder
pub const DEPLOYMENT_FILE_NAME: &str = "deployment.json";

/// Name of the archived source inside a per-token folder
pub const ARCHIVED_SOURCE_NAME: &str = "token.sol";

/// Default solc executable, looked up on `PATH`
pub const DEFAULT_SOLC: &str = "solc";

/// Optimizer runs, must match the verification request
pub const OPTIMIZER_RUNS: u32 = 200;

/// Target EVM version, must match the verification request
pub const EVM_VERSION: &str = "shanghai";

/// Full compiler version sent to the explorer
pub const COMPILER_VERSION: &str = "v0.8.24+commit.e11b9ed9";

/// Explorer license type id for "Unlicense"
pub const LICENSE_TYPE: &str = "1";

/// Gas limit of the contract-creation transaction
pub const DEPLOY_GAS_LIMIT: u128 = 3_500_000;

/// Legacy gas price of the contract-creation transaction, in gwei
pub const DEPLOY_GAS_PRICE_GWEI: u64 = 20;

/// Gas limit of a plain ETH transfer to the token
pub const SEND_ETH_GAS_LIMIT: u128 = 50_000;

/// Gas limit of the admin calls (transfer, removeLimit, ...)
pub const ADMIN_CALL_GAS_LIMIT: u128 = 100_000;

/// Gas limit of `openTrading()`, which creates the pair and adds liquidity
pub const OPEN_TRADING_GAS_LIMIT: u128 = 5_000_000;

/// Liquidity sent in post-deploy step 1 when `LIQUIDITY_AMOUNT` is unset
pub const DEFAULT_LIQUIDITY_AMOUNT: &str = "0.01";

/// Minimum ETH the token must hold before `openTrading()`
pub const MIN_LIQUIDITY: &str = "0.001";

/// Deployer balance under which a warning is printed
pub const LOW_BALANCE_WARNING: &str = "0.01";

/// Mainnet Etherscan endpoint used for price data
pub const PRICE_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Chain queried for the ETH price, always mainnet
pub const PRICE_CHAIN_ID: u64 = 1;

/// Price used when the live quote is unavailable
pub const FALLBACK_ETH_PRICE: f64 = 2300.0;

/// Timeout of the price request, in seconds
pub const PRICE_TIMEOUT_SECS: u64 = 10;

/// Timeout of the verification submission, in seconds
pub const SUBMIT_TIMEOUT_SECS: u64 = 30;

/// Delay before each verification status check, in seconds
pub const VERIFY_POLL_INTERVAL_SECS: u64 = 8;

/// Number of verification status checks before giving up
pub const VERIFY_MAX_ATTEMPTS: u32 = 15;
