use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("emendo")
        .about("Credential submission with email-correction recovery")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("provider-url")
                .long("provider-url")
                .help("Auth provider base URL, example: https://auth.tld/auth/v1")
                .env("EMENDO_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new("provider-key")
                .long("provider-key")
                .help("Auth provider API key")
                .env("EMENDO_PROVIDER_KEY"),
        )
        .arg(
            Arg::new("verifier-url")
                .long("verifier-url")
                .help("Email verification service base URL (second-pass validation is skipped when absent)")
                .env("EMENDO_VERIFIER_URL"),
        )
        .arg(
            Arg::new("verifier-key")
                .long("verifier-key")
                .help("Email verification service API key")
                .env("EMENDO_VERIFIER_KEY"),
        )
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Email to authenticate with")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Password, prefer the environment variable over the flag")
                .env("EMENDO_PASSWORD")
                .required(true),
        )
        .arg(
            Arg::new("sign-up")
                .long("sign-up")
                .help("Create an account instead of establishing a session")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("min-password-length")
                .long("min-password-length")
                .help("Minimum accepted password length")
                .default_value("6")
                .env("EMENDO_MIN_PASSWORD_LENGTH")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("EMENDO_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
