use std::path::Path;

pub const BANNER: &str = "
    ╔═══════════════════════════════════════════════════════════════╗
    ║                                                               ║
    ║   🤖 Agent Support GWS - Google Workspace Support Assistant   ║
    ║                                                               ║
    ╚═══════════════════════════════════════════════════════════════╝
";

pub const MENU: &str = "
    🔍 Choose an option:

    1. Submit support request
    2. View last response
    3. Help
    4. Exit
";

pub fn help_text(output_dir: &Path) -> String {
    format!(
        "
    📚 Help Guide
    ============

    This assistant can help you with various Google Workspace issues, such as:

    • Email configuration and troubleshooting
    • Account security and 2FA
    • Domain and DNS settings
    • User management
    • Access and permissions
    • Google Workspace features

    Tips for best results:
    ---------------------
    1. Be specific in your request
    2. Include relevant details
    3. Mention any error messages
    4. Specify the affected service

    All responses are saved in the '{}' directory.
",
        output_dir.display()
    )
}
