//! Welcome banner display for chat sessions.

use console::style;

/// What the banner reports about the session.
pub struct BannerInfo<'a> {
    pub server_url: &'a str,
    pub model: &'a str,
    pub speech: &'a str,
    pub voice_input: bool,
}

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(info: &BannerInfo<'_>) {
    println!();
    println!("  {}", style("Parlor").cyan().bold());
    println!("  {}", style(info.server_url).dim());
    println!();
    println!("  {}   {}", style("Model:").bold(), style(info.model).dim());
    println!("  {}  {}", style("Speech:").bold(), style(info.speech).dim());
    println!(
        "  {}   {}",
        style("Voice:").bold(),
        style(if info.voice_input { "/voice" } else { "not configured" }).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
