//! Provider configuration fixtures for user-pool acceptance scenarios.
//!
//! Every pool created by a scenario is named `terraform-test-pool-<suffix>`
//! unless given an exact name; the sweeper relies on nothing but that the
//! pools are disposable. Only the `aws_cognito_user_pool` block is rendered.
//! Supporting resources (IAM roles, Lambda functions) are referenced through
//! [`StringValue::Expression`].

use std::collections::BTreeMap;

pub const NAME_PREFIX: &str = "terraform-test-pool-";

// ── Values ────────────────────────────────────────────────────────────────────

/// A string attribute: either a literal or a reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringValue {
    Literal(String),
    /// Rendered bare, e.g. `aws_iam_role.test.arn`.
    Expression(String),
}

impl StringValue {
    pub fn expression(expr: impl Into<String>) -> Self {
        StringValue::Expression(expr.into())
    }

    fn render(&self) -> String {
        match self {
            StringValue::Literal(s) => quote(s),
            StringValue::Expression(e) => e.clone(),
        }
    }
}

impl From<&str> for StringValue {
    fn from(s: &str) -> Self {
        StringValue::Literal(s.to_string())
    }
}

impl From<String> for StringValue {
    fn from(s: String) -> Self {
        StringValue::Literal(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MfaConfiguration {
    Off,
    On,
    Optional,
}

impl MfaConfiguration {
    pub fn as_str(&self) -> &'static str {
        match self {
            MfaConfiguration::Off => "OFF",
            MfaConfiguration::On => "ON",
            MfaConfiguration::Optional => "OPTIONAL",
        }
    }
}

impl std::str::FromStr for MfaConfiguration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OFF" => Ok(MfaConfiguration::Off),
            "ON" => Ok(MfaConfiguration::On),
            "OPTIONAL" => Ok(MfaConfiguration::Optional),
            other => Err(format!("unknown mfa configuration '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultEmailOption {
    ConfirmWithCode,
    ConfirmWithLink,
}

impl DefaultEmailOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultEmailOption::ConfirmWithCode => "CONFIRM_WITH_CODE",
            DefaultEmailOption::ConfirmWithLink => "CONFIRM_WITH_LINK",
        }
    }
}

impl std::str::FromStr for DefaultEmailOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CONFIRM_WITH_CODE" => Ok(DefaultEmailOption::ConfirmWithCode),
            "CONFIRM_WITH_LINK" => Ok(DefaultEmailOption::ConfirmWithLink),
            other => Err(format!("unknown default email option '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDataType {
    String,
    Number,
    Boolean,
    DateTime,
}

impl AttributeDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeDataType::String => "String",
            AttributeDataType::Number => "Number",
            AttributeDataType::Boolean => "Boolean",
            AttributeDataType::DateTime => "DateTime",
        }
    }
}

/// Lambda hooks a pool can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LambdaTrigger {
    CreateAuthChallenge,
    CustomMessage,
    DefineAuthChallenge,
    PostAuthentication,
    PostConfirmation,
    PreAuthentication,
    PreSignUp,
    PreTokenGeneration,
    UserMigration,
    VerifyAuthChallengeResponse,
}

impl LambdaTrigger {
    pub const ALL: [LambdaTrigger; 10] = [
        LambdaTrigger::CreateAuthChallenge,
        LambdaTrigger::CustomMessage,
        LambdaTrigger::DefineAuthChallenge,
        LambdaTrigger::PostAuthentication,
        LambdaTrigger::PostConfirmation,
        LambdaTrigger::PreAuthentication,
        LambdaTrigger::PreSignUp,
        LambdaTrigger::PreTokenGeneration,
        LambdaTrigger::UserMigration,
        LambdaTrigger::VerifyAuthChallengeResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LambdaTrigger::CreateAuthChallenge => "create_auth_challenge",
            LambdaTrigger::CustomMessage => "custom_message",
            LambdaTrigger::DefineAuthChallenge => "define_auth_challenge",
            LambdaTrigger::PostAuthentication => "post_authentication",
            LambdaTrigger::PostConfirmation => "post_confirmation",
            LambdaTrigger::PreAuthentication => "pre_authentication",
            LambdaTrigger::PreSignUp => "pre_sign_up",
            LambdaTrigger::PreTokenGeneration => "pre_token_generation",
            LambdaTrigger::UserMigration => "user_migration",
            LambdaTrigger::VerifyAuthChallengeResponse => "verify_auth_challenge_response",
        }
    }
}

impl std::str::FromStr for LambdaTrigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('-', "_");
        LambdaTrigger::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown lambda trigger '{}'", s))
    }
}

// ── Nested blocks ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteMessageTemplate {
    pub email_message: Option<String>,
    pub email_subject: Option<String>,
    pub sms_message:   Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminCreateUserConfig {
    pub allow_admin_create_user_only: bool,
    pub invite_message_template:      Option<InviteMessageTemplate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfiguration {
    pub challenge_required_on_new_device:      bool,
    pub device_only_remembered_on_user_prompt: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailConfiguration {
    pub reply_to_email_address: Option<String>,
    pub source_arn:             Option<String>,
    /// `COGNITO_DEFAULT` or `DEVELOPER`.
    pub email_sending_account:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsConfiguration {
    pub external_id:    StringValue,
    pub sns_caller_arn: StringValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub minimum_length:                   u32,
    pub require_lowercase:                bool,
    pub require_numbers:                  bool,
    pub require_symbols:                  bool,
    pub require_uppercase:                bool,
    pub temporary_password_validity_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaAttribute {
    pub name:                     String,
    pub attribute_data_type:      AttributeDataType,
    pub developer_only_attribute: bool,
    pub mutable:                  bool,
    pub required:                 bool,
    /// `(min_length, max_length)`
    pub string_constraints:       Option<(u32, u32)>,
    /// `(min_value, max_value)`
    pub number_constraints:       Option<(i64, i64)>,
}

impl SchemaAttribute {
    pub fn new(name: impl Into<String>, attribute_data_type: AttributeDataType) -> Self {
        Self {
            name: name.into(),
            attribute_data_type,
            developer_only_attribute: false,
            mutable: false,
            required: false,
            string_constraints: None,
            number_constraints: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationMessageTemplate {
    pub default_email_option:  Option<DefaultEmailOption>,
    pub email_message:         Option<String>,
    pub email_message_by_link: Option<String>,
    pub email_subject:         Option<String>,
    pub email_subject_by_link: Option<String>,
    pub sms_message:           Option<String>,
}

// ── Fixture ───────────────────────────────────────────────────────────────────

/// One `aws_cognito_user_pool` resource block.
#[derive(Debug, Clone, Default)]
pub struct UserPoolFixture {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub alias_attributes: Vec<String>,
    pub auto_verified_attributes: Vec<String>,
    pub mfa_configuration: Option<MfaConfiguration>,
    pub email_verification_message: Option<String>,
    pub email_verification_subject: Option<String>,
    pub sms_verification_message: Option<String>,
    pub sms_authentication_message: Option<String>,
    pub admin_create_user_config: Option<AdminCreateUserConfig>,
    pub device_configuration: Option<DeviceConfiguration>,
    pub email_configuration: Option<EmailConfiguration>,
    pub lambda_config: BTreeMap<LambdaTrigger, StringValue>,
    pub password_policy: Option<PasswordPolicy>,
    pub schema: Vec<SchemaAttribute>,
    pub sms_configuration: Option<SmsConfiguration>,
    pub advanced_security_mode: Option<String>,
    pub verification_message_template: Option<VerificationMessageTemplate>,
}

impl UserPoolFixture {
    /// Pool named `terraform-test-pool-<name_suffix>`.
    pub fn new(name_suffix: impl Into<String>) -> Self {
        Self::named(format!("{}{}", NAME_PREFIX, name_suffix.into()))
    }

    /// Pool with exactly `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn pool_name(&self) -> &str {
        &self.name
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn alias_attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias_attributes = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn auto_verified_attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_verified_attributes = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn mfa(mut self, mfa: MfaConfiguration) -> Self {
        self.mfa_configuration = Some(mfa);
        self
    }

    pub fn sms_authentication_message(mut self, message: impl Into<String>) -> Self {
        self.sms_authentication_message = Some(message.into());
        self
    }

    pub fn sms_verification_message(mut self, message: impl Into<String>) -> Self {
        self.sms_verification_message = Some(message.into());
        self
    }

    pub fn email_verification(mut self, subject: impl Into<String>, message: impl Into<String>) -> Self {
        self.email_verification_subject = Some(subject.into());
        self.email_verification_message = Some(message.into());
        self
    }

    pub fn admin_create_user(mut self, config: AdminCreateUserConfig) -> Self {
        self.admin_create_user_config = Some(config);
        self
    }

    pub fn device(mut self, device: DeviceConfiguration) -> Self {
        self.device_configuration = Some(device);
        self
    }

    pub fn email_configuration(mut self, config: EmailConfiguration) -> Self {
        self.email_configuration = Some(config);
        self
    }

    pub fn lambda_trigger(mut self, trigger: LambdaTrigger, function_arn: impl Into<StringValue>) -> Self {
        self.lambda_config.insert(trigger, function_arn.into());
        self
    }

    pub fn password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = Some(policy);
        self
    }

    /// Appends one `schema` block.
    pub fn schema_attribute(mut self, attr: SchemaAttribute) -> Self {
        self.schema.push(attr);
        self
    }

    pub fn sms_configuration(mut self, config: SmsConfiguration) -> Self {
        self.sms_configuration = Some(config);
        self
    }

    pub fn advanced_security(mut self, mode: impl Into<String>) -> Self {
        self.advanced_security_mode = Some(mode.into());
        self
    }

    pub fn verification_message_template(mut self, template: VerificationMessageTemplate) -> Self {
        self.verification_message_template = Some(template);
        self
    }

    /// Render the resource block as HCL.
    pub fn render(&self) -> String {
        let mut root = Block::new("resource \"aws_cognito_user_pool\" \"test\"");
        root.attr("name", quote(&self.name));
        if !self.alias_attributes.is_empty() {
            root.attr("alias_attributes", list(&self.alias_attributes));
        }
        if !self.auto_verified_attributes.is_empty() {
            root.attr("auto_verified_attributes", list(&self.auto_verified_attributes));
        }
        if let Some(mfa) = self.mfa_configuration {
            root.attr("mfa_configuration", quote(mfa.as_str()));
        }
        root.opt("email_verification_message", &self.email_verification_message);
        root.opt("email_verification_subject", &self.email_verification_subject);
        root.opt("sms_verification_message", &self.sms_verification_message);
        root.opt("sms_authentication_message", &self.sms_authentication_message);

        if let Some(cfg) = &self.admin_create_user_config {
            let mut b = Block::new("admin_create_user_config");
            b.attr("allow_admin_create_user_only", cfg.allow_admin_create_user_only.to_string());
            if let Some(t) = &cfg.invite_message_template {
                let mut inner = Block::new("invite_message_template");
                inner.opt("email_message", &t.email_message);
                inner.opt("email_subject", &t.email_subject);
                inner.opt("sms_message", &t.sms_message);
                b.blocks.push(inner);
            }
            root.blocks.push(b);
        }

        if let Some(dev) = &self.device_configuration {
            let mut b = Block::new("device_configuration");
            b.attr("challenge_required_on_new_device", dev.challenge_required_on_new_device.to_string());
            b.attr(
                "device_only_remembered_on_user_prompt",
                dev.device_only_remembered_on_user_prompt.to_string(),
            );
            root.blocks.push(b);
        }

        if let Some(cfg) = &self.email_configuration {
            let mut b = Block::new("email_configuration");
            b.opt("reply_to_email_address", &cfg.reply_to_email_address);
            b.opt("source_arn", &cfg.source_arn);
            b.opt("email_sending_account", &cfg.email_sending_account);
            root.blocks.push(b);
        }

        if !self.lambda_config.is_empty() {
            let mut b = Block::new("lambda_config");
            for (trigger, arn) in &self.lambda_config {
                b.attr(trigger.as_str(), arn.render());
            }
            root.blocks.push(b);
        }

        if let Some(p) = &self.password_policy {
            let mut b = Block::new("password_policy");
            b.attr("minimum_length", p.minimum_length.to_string());
            b.attr("require_lowercase", p.require_lowercase.to_string());
            b.attr("require_numbers", p.require_numbers.to_string());
            b.attr("require_symbols", p.require_symbols.to_string());
            b.attr("require_uppercase", p.require_uppercase.to_string());
            if let Some(days) = p.temporary_password_validity_days {
                b.attr("temporary_password_validity_days", days.to_string());
            }
            root.blocks.push(b);
        }

        for s in &self.schema {
            let mut b = Block::new("schema");
            b.attr("attribute_data_type", quote(s.attribute_data_type.as_str()));
            b.attr("developer_only_attribute", s.developer_only_attribute.to_string());
            b.attr("mutable", s.mutable.to_string());
            b.attr("name", quote(&s.name));
            b.attr("required", s.required.to_string());
            if let Some((min, max)) = s.string_constraints {
                let mut c = Block::new("string_attribute_constraints");
                c.attr("min_length", min.to_string());
                c.attr("max_length", max.to_string());
                b.blocks.push(c);
            }
            if let Some((min, max)) = s.number_constraints {
                let mut c = Block::new("number_attribute_constraints");
                c.attr("min_value", min.to_string());
                c.attr("max_value", max.to_string());
                b.blocks.push(c);
            }
            root.blocks.push(b);
        }

        if let Some(cfg) = &self.sms_configuration {
            let mut b = Block::new("sms_configuration");
            b.attr("external_id", cfg.external_id.render());
            b.attr("sns_caller_arn", cfg.sns_caller_arn.render());
            root.blocks.push(b);
        }

        if let Some(mode) = &self.advanced_security_mode {
            let mut b = Block::new("user_pool_add_ons");
            b.attr("advanced_security_mode", quote(mode));
            root.blocks.push(b);
        }

        if let Some(t) = &self.verification_message_template {
            let mut b = Block::new("verification_message_template");
            if let Some(opt) = t.default_email_option {
                b.attr("default_email_option", quote(opt.as_str()));
            }
            b.opt("email_message", &t.email_message);
            b.opt("email_message_by_link", &t.email_message_by_link);
            b.opt("email_subject", &t.email_subject);
            b.opt("email_subject_by_link", &t.email_subject_by_link);
            b.opt("sms_message", &t.sms_message);
            root.blocks.push(b);
        }

        if !self.tags.is_empty() {
            let mut b = Block::new("tags =");
            for (k, v) in &self.tags {
                b.attrs.push((quote(k), quote(v)));
            }
            root.blocks.push(b);
        }

        let mut hcl = String::new();
        root.write(&mut hcl, 0);
        hcl
    }
}

// ── HCL writer ────────────────────────────────────────────────────────────────

/// A block or map: aligned attributes first, then nested blocks.
struct Block {
    header: String,
    attrs:  Vec<(String, String)>,
    blocks: Vec<Block>,
}

impl Block {
    fn new(header: impl Into<String>) -> Self {
        Self { header: header.into(), attrs: Vec::new(), blocks: Vec::new() }
    }

    fn attr(&mut self, key: &str, rendered: String) {
        self.attrs.push((key.to_string(), rendered));
    }

    fn opt(&mut self, key: &str, value: &Option<String>) {
        if let Some(v) = value {
            self.attr(key, quote(v));
        }
    }

    fn write(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        out.push_str(&format!("{}{} {{\n", pad, self.header));

        let width = self.attrs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (k, v) in &self.attrs {
            out.push_str(&format!("{}  {:width$} = {}\n", pad, k, v, width = width));
        }
        // Top-level blocks are separated by a blank line; nested ones are not.
        for b in &self.blocks {
            if depth == 0 {
                out.push('\n');
            }
            b.write(out, depth + 1);
        }

        out.push_str(&format!("{}}}\n", pad));
    }
}

/// HCL string literal. `${` and `%{` would start interpolation; `{####}`
/// placeholders are left alone.
fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace("${", "$${")
        .replace("%{", "%%{");
    format!("\"{}\"", escaped)
}

fn list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Lowercase alphanumeric suffix of exactly `len` characters.
pub fn random_suffix(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        out.push_str(&uuid::Uuid::new_v4().simple().to_string());
    }
    out.truncate(len);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_block() {
        let hcl = UserPoolFixture::new("abcde").render();
        assert_eq!(
            hcl,
            "resource \"aws_cognito_user_pool\" \"test\" {\n  name = \"terraform-test-pool-abcde\"\n}\n"
        );
    }

    #[test]
    fn sms_verification_messages_are_aligned() {
        let hcl = UserPoolFixture::new("x")
            .sms_authentication_message("{####} Baz")
            .sms_verification_message("{####} Baz")
            .render();
        assert!(hcl.contains("  name                       = \"terraform-test-pool-x\"\n"));
        assert!(hcl.contains("  sms_authentication_message = \"{####} Baz\"\n"));
        assert!(hcl.contains("  sms_verification_message   = \"{####} Baz\"\n"));
    }

    #[test]
    fn tags_render_sorted_and_aligned() {
        let hcl = UserPoolFixture::new("x")
            .tag("Project", "Terraform")
            .tag("Name", "FooBar")
            .render();
        assert!(hcl.ends_with(
            "\n  tags = {\n    \"Name\"    = \"FooBar\"\n    \"Project\" = \"Terraform\"\n  }\n}\n"
        ));
    }

    #[test]
    fn admin_create_user_config() {
        let hcl = UserPoolFixture::new("x")
            .admin_create_user(AdminCreateUserConfig {
                allow_admin_create_user_only: true,
                invite_message_template: Some(InviteMessageTemplate {
                    email_message: Some("Your username is {username} and temporary password is {####}. ".into()),
                    email_subject: Some("FooBar {####}".into()),
                    sms_message: Some("Your username is {username} and temporary password is {####}.".into()),
                }),
            })
            .render();
        let expected = concat!(
            "resource \"aws_cognito_user_pool\" \"test\" {\n",
            "  name = \"terraform-test-pool-x\"\n",
            "\n",
            "  admin_create_user_config {\n",
            "    allow_admin_create_user_only = true\n",
            "    invite_message_template {\n",
            "      email_message = \"Your username is {username} and temporary password is {####}. \"\n",
            "      email_subject = \"FooBar {####}\"\n",
            "      sms_message   = \"Your username is {username} and temporary password is {####}.\"\n",
            "    }\n",
            "  }\n",
            "}\n",
        );
        assert_eq!(hcl, expected);
    }

    #[test]
    fn device_and_advanced_security() {
        let hcl = UserPoolFixture::new("x")
            .device(DeviceConfiguration {
                challenge_required_on_new_device: true,
                device_only_remembered_on_user_prompt: false,
            })
            .advanced_security("OFF")
            .render();
        assert!(hcl.contains("  device_configuration {\n    challenge_required_on_new_device      = true\n    device_only_remembered_on_user_prompt = false\n  }\n"));
        assert!(hcl.contains("  user_pool_add_ons {\n    advanced_security_mode = \"OFF\"\n  }\n"));
    }

    #[test]
    fn email_configuration() {
        let hcl = UserPoolFixture::new("x")
            .email_configuration(EmailConfiguration {
                reply_to_email_address: Some("foo.bar@baz".into()),
                source_arn: Some("arn:aws:ses:us-east-1:123456789012:identity/foo@bar".into()),
                email_sending_account: Some("DEVELOPER".into()),
            })
            .render();
        assert!(hcl.contains("    reply_to_email_address = \"foo.bar@baz\"\n"));
        assert!(hcl.contains("    source_arn             = \"arn:aws:ses:us-east-1:123456789012:identity/foo@bar\"\n"));
        assert!(hcl.contains("    email_sending_account  = \"DEVELOPER\"\n"));
    }

    #[test]
    fn sms_configuration_references_role() {
        let hcl = UserPoolFixture::new("x")
            .sms_configuration(SmsConfiguration {
                external_id: StringValue::expression("data.aws_caller_identity.current.account_id"),
                sns_caller_arn: StringValue::expression("aws_iam_role.test.arn"),
            })
            .render();
        assert!(hcl.contains(concat!(
            "  sms_configuration {\n",
            "    external_id    = data.aws_caller_identity.current.account_id\n",
            "    sns_caller_arn = aws_iam_role.test.arn\n",
            "  }\n",
        )));
    }

    #[test]
    fn alias_and_auto_verified_attributes() {
        let hcl = UserPoolFixture::new("x")
            .alias_attributes(["email", "preferred_username"])
            .auto_verified_attributes(["email"])
            .render();
        assert!(hcl.contains("  alias_attributes         = [\"email\", \"preferred_username\"]\n"));
        assert!(hcl.contains("  auto_verified_attributes = [\"email\"]\n"));
    }

    #[test]
    fn password_policy() {
        let hcl = UserPoolFixture::new("x")
            .password_policy(PasswordPolicy {
                minimum_length: 7,
                require_lowercase: true,
                require_numbers: false,
                require_symbols: true,
                require_uppercase: false,
                temporary_password_validity_days: Some(7),
            })
            .render();
        assert!(hcl.contains(concat!(
            "  password_policy {\n",
            "    minimum_length                   = 7\n",
            "    require_lowercase                = true\n",
            "    require_numbers                  = false\n",
            "    require_symbols                  = true\n",
            "    require_uppercase                = false\n",
            "    temporary_password_validity_days = 7\n",
            "  }\n",
        )));
    }

    #[test]
    fn lambda_config_uses_every_trigger_in_name_order() {
        let fixture = LambdaTrigger::ALL.iter().fold(UserPoolFixture::named("lambda-pool"), |f, t| {
            f.lambda_trigger(*t, StringValue::expression("aws_lambda_function.test.arn"))
        });
        let hcl = fixture.render();
        assert!(hcl.contains("  name = \"lambda-pool\"\n"));
        assert!(hcl.contains("    create_auth_challenge          = aws_lambda_function.test.arn\n"));
        assert!(hcl.contains("    pre_sign_up                    = aws_lambda_function.test.arn\n"));
        assert!(hcl.contains("    verify_auth_challenge_response = aws_lambda_function.test.arn\n"));
        let first = hcl.find("create_auth_challenge").unwrap();
        let last = hcl.find("verify_auth_challenge_response").unwrap();
        assert!(first < last);
        assert_eq!(hcl.matches(" = aws_lambda_function.test.arn").count(), 10);
    }

    #[test]
    fn schema_attributes_with_constraints() {
        let email = SchemaAttribute {
            required: true,
            string_constraints: Some((5, 10)),
            ..SchemaAttribute::new("email", AttributeDataType::String)
        };
        let number = SchemaAttribute {
            developer_only_attribute: true,
            mutable: true,
            number_constraints: Some((2, 6)),
            ..SchemaAttribute::new("mynumber", AttributeDataType::Number)
        };
        let hcl = UserPoolFixture::named("schema-pool")
            .schema_attribute(email)
            .schema_attribute(number)
            .render();

        assert_eq!(hcl.matches("  schema {\n").count(), 2);
        assert!(hcl.contains(concat!(
            "  schema {\n",
            "    attribute_data_type      = \"String\"\n",
            "    developer_only_attribute = false\n",
            "    mutable                  = false\n",
            "    name                     = \"email\"\n",
            "    required                 = true\n",
            "    string_attribute_constraints {\n",
            "      min_length = 5\n",
            "      max_length = 10\n",
            "    }\n",
            "  }\n",
        )));
        assert!(hcl.contains(concat!(
            "    number_attribute_constraints {\n",
            "      min_value = 2\n",
            "      max_value = 6\n",
            "    }\n",
        )));
    }

    #[test]
    fn verification_message_template_by_link() {
        let hcl = UserPoolFixture::new("x")
            .verification_message_template(VerificationMessageTemplate {
                default_email_option: Some(DefaultEmailOption::ConfirmWithLink),
                email_message: Some("foo {####} bar".into()),
                email_message_by_link: Some("{##foobar##}".into()),
                email_subject: Some("foobar {####}".into()),
                email_subject_by_link: Some("foobar".into()),
                sms_message: Some("{####} baz".into()),
            })
            .render();
        assert!(hcl.contains(concat!(
            "  verification_message_template {\n",
            "    default_email_option  = \"CONFIRM_WITH_LINK\"\n",
            "    email_message         = \"foo {####} bar\"\n",
            "    email_message_by_link = \"{##foobar##}\"\n",
            "    email_subject         = \"foobar {####}\"\n",
            "    email_subject_by_link = \"foobar\"\n",
            "    sms_message           = \"{####} baz\"\n",
            "  }\n",
        )));
    }

    #[test]
    fn verification_message_template_default_email_option() {
        let hcl = UserPoolFixture::new("x")
            .email_verification("BazBaz {####}", "{####} Baz")
            .sms_verification_message("{####} BazBazBar?")
            .verification_message_template(VerificationMessageTemplate {
                default_email_option: Some(DefaultEmailOption::ConfirmWithCode),
                ..VerificationMessageTemplate::default()
            })
            .render();
        assert!(hcl.contains("  email_verification_message = \"{####} Baz\"\n"));
        assert!(hcl.contains("  email_verification_subject = \"BazBaz {####}\"\n"));
        assert!(hcl.contains("  sms_verification_message   = \"{####} BazBazBar?\"\n"));
        assert!(hcl.contains(
            "  verification_message_template {\n    default_email_option = \"CONFIRM_WITH_CODE\"\n  }\n"
        ));
    }

    #[test]
    fn combined_update_block() {
        let hcl = UserPoolFixture::new("x")
            .auto_verified_attributes(["email"])
            .mfa(MfaConfiguration::On)
            .email_verification("FooBar {####}", "Foo {####} Bar")
            .sms_verification_message("{####} Baz")
            .sms_authentication_message("{####} Bar")
            .admin_create_user(AdminCreateUserConfig {
                allow_admin_create_user_only: true,
                invite_message_template: None,
            })
            .device(DeviceConfiguration {
                challenge_required_on_new_device: true,
                device_only_remembered_on_user_prompt: false,
            })
            .verification_message_template(VerificationMessageTemplate {
                default_email_option: Some(DefaultEmailOption::ConfirmWithCode),
                ..VerificationMessageTemplate::default()
            })
            .sms_configuration(SmsConfiguration {
                external_id: StringValue::expression("data.aws_caller_identity.current.account_id"),
                sns_caller_arn: StringValue::expression("aws_iam_role.test.arn"),
            })
            .tag("Name", "Foo")
            .render();

        assert!(hcl.contains("  mfa_configuration          = \"ON\"\n"));
        assert!(hcl.contains("  sms_authentication_message = \"{####} Bar\"\n"));
        let order = [
            "admin_create_user_config {",
            "device_configuration {",
            "sms_configuration {",
            "verification_message_template {",
            "tags = {",
        ];
        let positions: Vec<usize> = order.iter().map(|s| hcl.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(hcl.ends_with("  tags = {\n    \"Name\" = \"Foo\"\n  }\n}\n"));
    }

    #[test]
    fn quoting_escapes_interpolation() {
        assert_eq!(quote("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(quote("${var.x}"), "\"$${var.x}\"");
        assert_eq!(quote("{username} {####}"), "\"{username} {####}\"");
        assert_eq!(StringValue::from("${x}").render(), "\"$${x}\"");
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("optional".parse::<MfaConfiguration>().unwrap(), MfaConfiguration::Optional);
        assert!("sometimes".parse::<MfaConfiguration>().is_err());
        assert_eq!(
            "confirm_with_link".parse::<DefaultEmailOption>().unwrap(),
            DefaultEmailOption::ConfirmWithLink
        );
        assert_eq!("pre-sign-up".parse::<LambdaTrigger>().unwrap(), LambdaTrigger::PreSignUp);
        assert!("on_login".parse::<LambdaTrigger>().is_err());
    }

    #[test]
    fn random_suffix_shape() {
        let s = random_suffix(5);
        assert_eq!(s.len(), 5);
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_ne!(random_suffix(10), random_suffix(10));
        assert_eq!(random_suffix(0), "");
    }

    #[test]
    fn random_suffix_longer_than_one_uuid() {
        let s = random_suffix(70);
        assert_eq!(s.len(), 70);
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
