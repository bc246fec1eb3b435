mod deploy;
mod list;
mod post_deploy;
mod verify;

pub use deploy::deploy_token;
pub use list::{list_tokens, print_available_tokens};
pub use post_deploy::{liquidity_shortfall, post_deploy, FailurePolicy, LaunchStep};
pub use verify::{contract_links, poll_verification, verify_token, PollOutcome};
