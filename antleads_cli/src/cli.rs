use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "antleads")]
#[command(about = "AntLeads - inspect, preview and test contact widgets")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  antleads config wgt_abc123                 Show a widget's public configuration
  antleads preview wgt_abc123 --out w.html   Render the widget to a standalone page
  antleads embed wgt_abc123                  Print the embed code for a site
  antleads submit wgt_abc123 --name Jane --email jane@example.com

\x1b[1;36mBackend:\x1b[0m
  Set ANTLEADS_API_BASE_URL or pass --base-url (default http://localhost:8001).
  Settings can also live in ~/.config/antleads/settings.toml")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides settings file and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP timeout in seconds (0 disables)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and show a widget's public configuration
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  antleads config wgt_abc123
  antleads config wgt_abc123 --output json")]
    Config {
        /// Public widget ID (the data-widget-id value)
        widget_id: String,
    },

    /// Render the widget's trigger and modal to a standalone HTML page
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  antleads preview wgt_abc123                   Print HTML to stdout
  antleads preview wgt_abc123 --out preview.html
  antleads preview wgt_abc123 --bind-to '#contact'")]
    Preview {
        widget_id: String,
        /// CSS selector of an existing element to use as the trigger
        #[arg(long)]
        bind_to: Option<String>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<std::path::PathBuf>,
    },

    /// Print the <script> tag to embed a widget on a site
    Embed {
        widget_id: String,
        /// Where the widget script is served from
        #[arg(long, default_value = "http://localhost:8000/static/widget.js")]
        script_src: String,
        /// CSS selector of an existing element to use as the trigger
        #[arg(long)]
        bind_to: Option<String>,
    },

    /// Submit a lead through a widget, exactly as a visitor would
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  antleads submit wgt_abc123 --name Jane --email jane@example.com
  antleads submit wgt_abc123 --name Jane --email j@x.com --estimated-value 50000")]
    Submit {
        widget_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        estimated_value: Option<String>,
        /// Page location reported with the submission
        #[arg(long, default_value = "about:blank")]
        page_url: String,
        #[arg(long)]
        referrer: Option<String>,
        /// Extra fields as key=value
        #[arg(short, long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
