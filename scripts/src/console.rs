//! Operator-facing output: banners, section headers and status lines

use colored::Colorize;

const DEPLOYER_BANNER: &str = r"
    ██████╗ ███████╗██████╗ ██╗      ██████╗ ██╗   ██╗███████╗██████╗
    ██╔══██╗██╔════╝██╔══██╗██║     ██╔═══██╗╚██╗ ██╔╝██╔════╝██╔══██╗
    ██║  ██║█████╗  ██████╔╝██║     ██║   ██║ ╚████╔╝ █████╗  ██████╔╝
    ██║  ██║██╔══╝  ██╔═══╝ ██║     ██║   ██║  ╚██╔╝  ██╔══╝  ██╔══██╗
    ██████╔╝███████╗██║     ███████╗╚██████╔╝   ██║   ███████╗██║  ██║
    ╚═════╝ ╚══════╝╚═╝     ╚══════╝ ╚═════╝    ╚═╝   ╚══════╝╚═╝  ╚═╝
";

const VERIFIER_BANNER: &str = r"
    ██╗   ██╗███████╗██████╗ ██╗███████╗██╗███████╗██████╗
    ██║   ██║██╔════╝██╔══██╗██║██╔════╝██║██╔════╝██╔══██╗
    ██║   ██║█████╗  ██████╔╝██║█████╗  ██║█████╗  ██████╔╝
    ╚██╗ ██╔╝██╔══╝  ██╔══██╗██║██╔══╝  ██║██╔══╝  ██╔══██╗
     ╚████╔╝ ███████╗██║  ██║██║██║     ██║███████╗██║  ██║
      ╚═══╝  ╚══════╝╚═╝  ╚═╝╚═╝╚═╝     ╚═╝╚══════╝╚═╝  ╚═╝
";

/// Which tool banner to print
#[derive(Clone, Copy)]
pub enum Banner {
    Deployer,
    Verifier,
}

pub fn banner(kind: Banner) {
    let (art, tagline) = match kind {
        Banner::Deployer => (DEPLOYER_BANNER, "🚀 Token Deployment Tool"),
        Banner::Verifier => (VERIFIER_BANNER, "🔍 Smart Contract Verification Tool"),
    };
    println!("{}", art.cyan());
    println!("    {}", tagline.bold());
    println!("    {}", "━".repeat(64).dimmed());
}

pub fn success(message: &str) {
    println!("{}", format!("✅ {message}").green());
}

pub fn error(message: &str) {
    println!("{}", format!("❌ {message}").red());
}

pub fn warning(message: &str) {
    println!("{}", format!("⚠️  {message}").yellow());
}

pub fn info(message: &str) {
    println!("{}", format!("ℹ️  {message}").blue());
}

/// Boxed header used for final outcomes
pub fn header(message: &str) {
    println!("\n{}", "═".repeat(60).cyan());
    println!("{}", message.cyan());
    println!("{}", "═".repeat(60).cyan());
}

/// Section title
pub fn sub_header(message: &str) {
    println!("\n{}", format!("📋 {message}").magenta());
    println!("{}", "─".repeat(40).dimmed());
}

/// Indented detail line
pub fn detail(message: &str) {
    println!("   {message}");
}

pub fn detail_dim(message: &str) {
    println!("{}", format!("   {message}").dimmed());
}

pub fn detail_ok(message: &str) {
    println!("{}", format!("   {message}").green());
}

pub fn detail_err(message: &str) {
    println!("{}", format!("   {message}").red());
}

pub fn detail_link(message: &str) {
    println!("{}", format!("   {message}").blue());
}

/// Step title of the post-deploy sequence
pub fn step(label: &str, title: &str) {
    println!("\n{}", format!("=== STEP {label}: {title} ===").bold());
}

/// Bold closing line
pub fn closing(message: &str) {
    println!("\n{}", message.bold());
}
