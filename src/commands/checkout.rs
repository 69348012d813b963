use clap::Args;

use ppcheckout::command::SystemRunner;
use ppcheckout::http::HttpRemote;
use ppcheckout::logging::Verbosity;
use ppcheckout::settings::Settings;
use ppcheckout::{Checkout, CheckoutReport, CheckoutRequest};

use super::CmdResult;

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Project ID, or any text containing one such as the project URL
    #[arg(value_name = "PROJECTID")]
    pub projectid: String,

    /// Local project name (default: derived from the title)
    #[arg(value_name = "PROJECTNAME")]
    pub projectname: Option<String>,

    /// Template directory copied into the new project
    #[arg(long, value_name = "DIR")]
    pub template: Option<String>,

    /// Root URL of the proofreading site
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl CheckoutArgs {
    /// Apply command-line overrides on top of the loaded settings.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(template) = &self.template {
            settings.template_dir = template.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        settings
    }
}

pub fn run(
    args: &CheckoutArgs,
    settings: Settings,
    verbosity: Verbosity,
) -> CmdResult<CheckoutReport> {
    let settings = args.apply(settings);
    settings.validate()?;
    let remote = HttpRemote::new(settings.http_timeout())?;
    let request = CheckoutRequest::new(args.projectid.clone(), args.projectname.clone());

    let report = Checkout::new(settings, remote, SystemRunner)
        .with_verbosity(verbosity)
        .run(&request)?;

    Ok((report, 0))
}
