use clap::Parser;
use fetch_page::{Browse, BrowseAccess, PageRequest, ScreenshotRequest};

mod args;
use args::{Args, convert_transforms};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Fetching {} URL(s)", args.urls.len());

    // Convert from CLI argument transforms to internal transforms
    let transforms = convert_transforms(&args.transforms);

    let screenshot = match (args.screenshot_width, args.screenshot_height) {
        (Some(width), Some(height)) => Some(ScreenshotRequest {
            width,
            height,
            quality: args.screenshot_quality,
        }),
        (None, None) => None,
        _ => {
            eprintln!("Both --screenshot-width and --screenshot-height must be given");
            std::process::exit(1);
        }
    };

    let requests: Vec<PageRequest> = args
        .urls
        .iter()
        .map(|url| {
            let mut request = PageRequest::new(url, transforms.clone());
            if let Some(shot) = &screenshot {
                request = request.with_screenshot(shot.clone());
            }
            request
        })
        .collect();

    // The --endpoint flag wins over the environment default
    let endpoint = args
        .endpoint
        .or_else(|| std::env::var("FETCH_PAGE_WSS_ENDPOINT").ok());

    let access = BrowseAccess::new(None);
    let browse = {
        let mut browse = Browse::new().with_navigation_timeout(args.timeout);
        if let Some(endpoint) = endpoint {
            browse = browse.with_default_endpoint(endpoint);
        }
        browse
    };

    let start_time = std::time::Instant::now();

    let batch = match browse.fetch(&access, &requests).await {
        Ok(batch) => batch,
        Err(e) => {
            ::log::error!("Batch rejected: {}", e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let duration = start_time.elapsed();
    ::log::info!(
        "Fetched {} page(s) via {} in {:.2} seconds",
        batch.pages.len(),
        batch.worker_host,
        duration.as_secs_f64()
    );

    match serde_json::to_string_pretty(&batch) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            ::log::error!("Failed to serialize results: {}", e);
            std::process::exit(1);
        }
    }
}
