use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "poolsweep",
    about = "Delete leftover Cognito user pools after acceptance test runs",
    version
)]
pub struct Cli {
    /// YAML config file (regions, page_size, endpoint, sweepers).
    #[arg(long, env = "POOLSWEEP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log line format. Filtering follows RUST_LOG (default: info).
    #[arg(long, env = "POOLSWEEP_LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the selected sweepers in every region.
    Sweep {
        /// Region to sweep. Repeatable; replaces the config file's list.
        #[arg(long = "region", env = "POOLSWEEP_REGIONS", value_delimiter = ',')]
        regions: Vec<String>,

        /// Sweeper to run (dependencies are added). Repeatable; default all.
        #[arg(long = "sweeper", env = "POOLSWEEP_SWEEPERS", value_delimiter = ',')]
        sweepers: Vec<String>,

        /// Items requested per list call (1-60).
        #[arg(long, env = "POOLSWEEP_PAGE_SIZE")]
        page_size: Option<u32>,

        /// Service URL override, e.g. a local emulator.
        #[arg(long, env = "POOLSWEEP_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// List registered sweepers in run order.
    List,

    /// Check that the service is usable in a region.
    Precheck {
        #[arg(long, env = "POOLSWEEP_REGION")]
        region: Option<String>,

        #[arg(long, env = "POOLSWEEP_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// Verify that the given user pools no longer exist.
    CheckDestroyed {
        #[arg(long, env = "POOLSWEEP_REGION")]
        region: Option<String>,

        #[arg(long, env = "POOLSWEEP_ENDPOINT")]
        endpoint: Option<String>,

        /// User pool ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print an aws_cognito_user_pool resource block.
    Render(RenderArgs),
}

#[derive(Debug, Default, Args)]
pub struct RenderArgs {
    /// Pool name suffix; random when absent.
    #[arg(long, conflicts_with = "name")]
    pub name_suffix: Option<String>,

    /// Exact pool name, without the terraform-test-pool- prefix.
    #[arg(long)]
    pub name: Option<String>,

    /// Tag as KEY=VALUE. Repeatable.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// OFF, ON or OPTIONAL.
    #[arg(long)]
    pub mfa: Option<String>,

    /// Repeatable.
    #[arg(long = "alias-attribute")]
    pub alias_attributes: Vec<String>,

    /// Repeatable.
    #[arg(long = "auto-verified-attribute")]
    pub auto_verified_attributes: Vec<String>,

    #[arg(long)]
    pub sms_authentication_message: Option<String>,

    #[arg(long)]
    pub sms_verification_message: Option<String>,

    #[arg(long, requires = "email_verification_message")]
    pub email_verification_subject: Option<String>,

    #[arg(long, requires = "email_verification_subject")]
    pub email_verification_message: Option<String>,

    #[arg(long)]
    pub allow_admin_create_user_only: Option<bool>,

    /// Adds device_configuration; the other device flag defaults to false.
    #[arg(long)]
    pub challenge_required_on_new_device: Option<bool>,

    #[arg(long)]
    pub device_only_remembered_on_user_prompt: Option<bool>,

    #[arg(long)]
    pub reply_to_email_address: Option<String>,

    /// COGNITO_DEFAULT or DEVELOPER.
    #[arg(long)]
    pub email_sending_account: Option<String>,

    /// Adds password_policy with every require_* flag off unless named.
    #[arg(long)]
    pub password_minimum_length: Option<u32>,

    /// lowercase, numbers, symbols or uppercase. Repeatable.
    #[arg(long = "password-require", requires = "password_minimum_length")]
    pub password_requires: Vec<String>,

    /// TRIGGER=EXPRESSION, e.g. pre_sign_up=aws_lambda_function.test.arn. Repeatable.
    #[arg(long = "lambda")]
    pub lambda_triggers: Vec<String>,

    /// Literal SNS caller role ARN; adds sms_configuration.
    #[arg(long, requires = "sms_external_id")]
    pub sns_caller_arn: Option<String>,

    #[arg(long, requires = "sns_caller_arn")]
    pub sms_external_id: Option<String>,

    /// OFF, AUDIT or ENFORCED.
    #[arg(long)]
    pub advanced_security_mode: Option<String>,

    /// CONFIRM_WITH_CODE or CONFIRM_WITH_LINK; adds verification_message_template.
    #[arg(long)]
    pub default_email_option: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
