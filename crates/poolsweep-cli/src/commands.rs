use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use poolsweep_config::SweepConfig;
use poolsweep_domain::Region;
use poolsweep_driver::fixture::{
    random_suffix, AdminCreateUserConfig, DefaultEmailOption, DeviceConfiguration, EmailConfiguration,
    LambdaTrigger, MfaConfiguration, PasswordPolicy, SmsConfiguration, StringValue,
    VerificationMessageTemplate,
};
use poolsweep_driver::{ClientFactory, CognitoClientFactory, DirectoryClient, UserPoolFixture};
use poolsweep_sweeper::{SweepOptions, SweepReport, SweeperRegistry};
use tracing::info;

use crate::cli::RenderArgs;
use crate::output;

// ── Settings ──────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<SweepConfig> {
    match path {
        Some(p) => poolsweep_config::load_config(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => Ok(SweepConfig::default()),
    }
}

#[derive(Debug)]
struct SweepSettings {
    regions:  Vec<Region>,
    sweepers: Vec<String>,
    options:  SweepOptions,
    endpoint: Option<String>,
}

/// Command-line values win over the config file.
fn resolve_sweep(
    config: SweepConfig,
    regions: Vec<String>,
    sweepers: Vec<String>,
    page_size: Option<u32>,
    endpoint: Option<String>,
) -> Result<SweepSettings> {
    let regions = if regions.is_empty() {
        config.regions
    } else {
        let mut parsed: Vec<Region> = Vec::new();
        for r in regions {
            let region = Region::new(r.as_str()).with_context(|| format!("Invalid --region '{r}'"))?;
            if !parsed.contains(&region) {
                parsed.push(region);
            }
        }
        parsed
    };
    if regions.is_empty() {
        anyhow::bail!("no regions to sweep; pass --region or set `regions` in the config file");
    }

    let sweepers = if sweepers.is_empty() {
        config.sweepers.iter().map(|s| s.to_string()).collect()
    } else {
        sweepers
    };

    let options = match page_size.or(config.page_size) {
        Some(0) => anyhow::bail!("--page-size must be at least 1"),
        Some(n) => SweepOptions::new(n),
        None => SweepOptions::default(),
    };

    Ok(SweepSettings { regions, sweepers, options, endpoint: endpoint.or(config.endpoint) })
}

/// `--region`, else the first configured region.
fn single_region(flag: Option<String>, config: &SweepConfig) -> Result<Region> {
    match flag {
        Some(r) => Region::new(r.as_str()).with_context(|| format!("Invalid --region '{r}'")),
        None => config
            .regions
            .first()
            .cloned()
            .context("--region (or POOLSWEEP_REGION) is required when the config file names no regions"),
    }
}

async fn client(region: &Region, endpoint: Option<String>) -> Result<Arc<dyn DirectoryClient>> {
    let factory = CognitoClientFactory::from_env(endpoint)
        .await
        .context("Failed to resolve AWS credentials")?;
    factory
        .client_for(region)
        .await
        .with_context(|| format!("Failed to build client for {region}"))
}

// ── Sweep ─────────────────────────────────────────────────────────────────────

pub async fn sweep(
    config_path: Option<PathBuf>,
    regions: Vec<String>,
    sweepers: Vec<String>,
    page_size: Option<u32>,
    endpoint: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let settings = resolve_sweep(config, regions, sweepers, page_size, endpoint)?;
    let registry = poolsweep_sweeper::init().context("Failed to register sweepers")?;

    let factory = CognitoClientFactory::from_env(settings.endpoint.clone())
        .await
        .context("Failed to resolve AWS credentials")?;

    run_sweeps(&registry, &factory, &settings).await?;
    Ok(())
}

/// Every region in order; within a region, sweepers in dependency order.
/// Stops at the first fatal error.
async fn run_sweeps(
    registry: &SweeperRegistry,
    factory: &dyn ClientFactory,
    settings: &SweepSettings,
) -> Result<Vec<SweepReport>> {
    let order = registry.run_order(&settings.sweepers)?;
    let mut reports = Vec::new();

    for region in &settings.regions {
        for entry in &order {
            info!(%region, sweeper = %entry.name, "running sweeper");
            let report = entry
                .sweeper
                .sweep(&entry.name, region, factory, &settings.options)
                .await
                .with_context(|| format!("Sweeper {} failed in {}", entry.name, region))?;
            print!("{}", output::render_report(&report));
            reports.push(report);
        }
    }

    Ok(reports)
}

// ── List ──────────────────────────────────────────────────────────────────────

pub fn list() -> Result<()> {
    let registry = poolsweep_sweeper::init().context("Failed to register sweepers")?;
    let order = registry.run_order(&[])?;
    print!("{}", output::render_sweepers(&order));
    Ok(())
}

// ── Precheck ──────────────────────────────────────────────────────────────────

pub async fn precheck(
    config_path: Option<PathBuf>,
    region: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let region = single_region(region, &config)?;
    let client = client(&region, endpoint.or(config.endpoint)).await?;

    let result = poolsweep_sweeper::precheck(client.as_ref())
        .await
        .context("Pre-check failed")?;
    println!("{}", output::render_precheck(region.as_str(), &result));
    Ok(())
}

// ── Check destroyed ───────────────────────────────────────────────────────────

pub async fn check_destroyed(
    config_path: Option<PathBuf>,
    region: Option<String>,
    endpoint: Option<String>,
    ids: Vec<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let region = single_region(region, &config)?;
    let client = client(&region, endpoint.or(config.endpoint)).await?;

    poolsweep_sweeper::check_destroyed(client.as_ref(), &ids).await?;
    println!("{} user pool(s) destroyed in {}", ids.len(), region);
    Ok(())
}

// ── Render ────────────────────────────────────────────────────────────────────

pub fn render(args: RenderArgs) -> Result<()> {
    let fixture = build_fixture(args)?;
    print!("{}", fixture.render());
    Ok(())
}

fn build_fixture(args: RenderArgs) -> Result<UserPoolFixture> {
    let mut fixture = match args.name {
        Some(name) => UserPoolFixture::named(name),
        None => UserPoolFixture::new(args.name_suffix.unwrap_or_else(|| random_suffix(5))),
    };

    for tag in &args.tags {
        let (k, v) = tag
            .split_once('=')
            .with_context(|| format!("--tag '{tag}' must be KEY=VALUE"))?;
        fixture = fixture.tag(k, v);
    }

    if let Some(m) = args.mfa {
        let mfa: MfaConfiguration = m.parse().map_err(anyhow::Error::msg)?;
        fixture = fixture.mfa(mfa);
    }
    if !args.alias_attributes.is_empty() {
        fixture = fixture.alias_attributes(args.alias_attributes);
    }
    if !args.auto_verified_attributes.is_empty() {
        fixture = fixture.auto_verified_attributes(args.auto_verified_attributes);
    }
    if let Some(m) = args.sms_authentication_message {
        fixture = fixture.sms_authentication_message(m);
    }
    if let Some(m) = args.sms_verification_message {
        fixture = fixture.sms_verification_message(m);
    }
    if let (Some(subject), Some(message)) = (args.email_verification_subject, args.email_verification_message) {
        fixture = fixture.email_verification(subject, message);
    }

    if let Some(only) = args.allow_admin_create_user_only {
        fixture = fixture.admin_create_user(AdminCreateUserConfig {
            allow_admin_create_user_only: only,
            invite_message_template: None,
        });
    }

    if args.challenge_required_on_new_device.is_some() || args.device_only_remembered_on_user_prompt.is_some() {
        fixture = fixture.device(DeviceConfiguration {
            challenge_required_on_new_device: args.challenge_required_on_new_device.unwrap_or(false),
            device_only_remembered_on_user_prompt: args.device_only_remembered_on_user_prompt.unwrap_or(false),
        });
    }

    if args.reply_to_email_address.is_some() || args.email_sending_account.is_some() {
        fixture = fixture.email_configuration(EmailConfiguration {
            reply_to_email_address: args.reply_to_email_address,
            source_arn: None,
            email_sending_account: args.email_sending_account,
        });
    }

    if let Some(minimum_length) = args.password_minimum_length {
        let mut policy = PasswordPolicy {
            minimum_length,
            require_lowercase: false,
            require_numbers: false,
            require_symbols: false,
            require_uppercase: false,
            temporary_password_validity_days: None,
        };
        for req in &args.password_requires {
            match req.to_ascii_lowercase().as_str() {
                "lowercase" => policy.require_lowercase = true,
                "numbers" => policy.require_numbers = true,
                "symbols" => policy.require_symbols = true,
                "uppercase" => policy.require_uppercase = true,
                other => anyhow::bail!("unknown --password-require '{other}'"),
            }
        }
        fixture = fixture.password_policy(policy);
    }

    for spec in &args.lambda_triggers {
        let (trigger, expr) = spec
            .split_once('=')
            .with_context(|| format!("--lambda '{spec}' must be TRIGGER=EXPRESSION"))?;
        let trigger: LambdaTrigger = trigger.parse().map_err(anyhow::Error::msg)?;
        fixture = fixture.lambda_trigger(trigger, StringValue::expression(expr));
    }

    if let (Some(arn), Some(external_id)) = (args.sns_caller_arn, args.sms_external_id) {
        fixture = fixture.sms_configuration(SmsConfiguration {
            external_id: external_id.into(),
            sns_caller_arn: arn.into(),
        });
    }

    if let Some(mode) = args.advanced_security_mode {
        fixture = fixture.advanced_security(mode.to_ascii_uppercase());
    }

    if let Some(opt) = args.default_email_option {
        let opt: DefaultEmailOption = opt.parse().map_err(anyhow::Error::msg)?;
        fixture = fixture.verification_message_template(VerificationMessageTemplate {
            default_email_option: Some(opt),
            ..VerificationMessageTemplate::default()
        });
    }
    Ok(fixture)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
