use clap::{Parser, ValueEnum};
use fetch_page::Transform;

#[derive(Parser, Debug)]
#[command(name = "fetch-page")]
#[command(about = "Fetches pages through a remote headless browser and extracts their content")]
#[command(version)]
pub struct Args {
    /// Target URLs to fetch (absolute)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Browser automation endpoint (ws:// or wss://)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Content representations to extract (defaults to text)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub transforms: Vec<TransformArg>,

    /// Screenshot width in pixels (requires --screenshot-height)
    #[arg(long)]
    pub screenshot_width: Option<u32>,

    /// Screenshot height in pixels
    #[arg(long)]
    pub screenshot_height: Option<u32>,

    /// Screenshot WebP quality (0-100)
    #[arg(long)]
    pub screenshot_quality: Option<u32>,

    /// Connection and navigation timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransformArg {
    Html,
    Text,
    Markdown,
}

/// Convert from CLI argument transforms to internal transforms
pub fn convert_transforms(args: &[TransformArg]) -> Vec<Transform> {
    if args.is_empty() {
        return vec![Transform::Text];
    }

    args.iter()
        .map(|arg| match arg {
            TransformArg::Html => Transform::Html,
            TransformArg::Text => Transform::Text,
            TransformArg::Markdown => Transform::Markdown,
        })
        .collect()
}
