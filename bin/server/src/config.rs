use crate::constants::{
    DEFAULT_DIRECTORY, DEFAULT_HOST, DEFAULT_PORT, ENV_DIRECTORY, ENV_HOST, ENV_PORT, ENV_SECRET,
};
use clap::{Arg, ArgMatches, Command};
use common::SecretGate;
use std::ffi::OsString;
use std::net::{Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use storage::{filesystem::DEFAULT_MAX_NAME_ATTEMPTS, DEFAULT_PART_SIZE};

/// Server configuration, fixed once the listener starts
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory uploads are written to (validated when the state is built)
    pub directory: PathBuf,
    /// Optional query-parameter secret
    pub secret: SecretGate,
    /// Bytes buffered per write while streaming a body
    pub part_size: usize,
    /// Collision suffixes tried before an upload is refused
    pub max_name_attempts: usize,
    /// Worker thread count; actix picks one per core when unset
    pub workers: Option<usize>,
}

fn command() -> Command {
    Command::new("upload-server")
        .about(
            "HTTP server that accepts POST and PUT requests and saves the body content to a file. \
             Best used with \"curl -T ./myFile.txt IP:PORT/myFile.txt\"",
        )
        .arg(
            Arg::new("port")
                .value_name("PORT")
                .help("Port to listen on (default: 8123, or SERVER_PORT env var)"),
        )
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .value_name("DIR")
                .help("Directory to save files to (default: ./, or UPLOAD_DIR env var)"),
        )
        .arg(
            Arg::new("ip")
                .short('i')
                .long("ip")
                .value_name("IP")
                .help("IP to listen on (default: 0.0.0.0, or SERVER_HOST env var)"),
        )
        .arg(
            Arg::new("secret")
                .short('s')
                .long("secret")
                .value_name("SECRET")
                .help(
                    "If specified, this (case-sensitive, alphanumeric) value must be present as a \
                     URL parameter for the server to accept the file, e.g. \
                     http://1.2.3.4:8123/file?mySecretParam (or UPLOAD_SECRET env var)",
                ),
        )
        .arg(
            Arg::new("part-size")
                .long("part-size")
                .value_name("BYTES")
                .help("Bytes buffered per write while receiving a body (default: 268435456)"),
        )
        .arg(
            Arg::new("max-name-attempts")
                .long("max-name-attempts")
                .value_name("COUNT")
                .help("Filename suffixes tried before giving up on an upload (default: 10000)"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .value_name("COUNT")
                .help("Number of worker threads (default: one per CPU core)"),
        )
}

impl ServerConfig {
    /// Parse the process arguments; prints usage and exits on bad flags.
    pub fn load() -> Result<Self, std::io::Error> {
        let matches = command().get_matches();
        Self::from_matches(&matches, |key| std::env::var(key).ok())
    }

    /// Parse an explicit argument list, with `env` standing in for the
    /// process environment.
    pub fn from_args<I, T, F>(args: I, env: F) -> Result<Self, std::io::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: Fn(&str) -> Option<String>,
    {
        let matches = command()
            .try_get_matches_from(args)
            .map_err(|e| invalid_input(e.to_string()))?;
        Self::from_matches(&matches, env)
    }

    fn from_matches<F>(matches: &ArgMatches, env: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Priority: command-line args > environment variables > defaults
        let lookup = |arg: &str, key: &str| {
            matches
                .get_one::<String>(arg)
                .cloned()
                .or_else(|| env(key))
        };

        let host = lookup("ip", ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port_str = lookup("port", ENV_PORT).unwrap_or_else(|| DEFAULT_PORT.to_string());
        let port = parse_number::<u16>("port number", &port_str)?;

        let directory = PathBuf::from(
            lookup("directory", ENV_DIRECTORY).unwrap_or_else(|| DEFAULT_DIRECTORY.to_string()),
        );
        let secret = SecretGate::new(lookup("secret", ENV_SECRET));

        let part_size = match matches.get_one::<String>("part-size") {
            Some(s) => parse_positive("part size", s)?,
            None => DEFAULT_PART_SIZE,
        };
        let max_name_attempts = match matches.get_one::<String>("max-name-attempts") {
            Some(s) => parse_positive("max name attempts", s)?,
            None => DEFAULT_MAX_NAME_ATTEMPTS,
        };
        let workers = matches
            .get_one::<String>("workers")
            .map(|s| parse_positive("worker count", s))
            .transpose()?;

        Ok(ServerConfig {
            host,
            port,
            directory,
            secret,
            part_size,
            max_name_attempts,
            workers,
        })
    }

    /// `host:port`, with IPv6 hosts in brackets (`[::1]:8123`)
    pub fn bind_address(&self) -> String {
        match self.host.parse::<Ipv6Addr>() {
            Ok(ip) => SocketAddr::from((ip, self.port)).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }
}

fn invalid_input(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, msg)
}

fn parse_number<T: FromStr>(what: &str, value: &str) -> Result<T, std::io::Error> {
    value
        .parse()
        .map_err(|_| invalid_input(format!("Invalid {}: {}", what, value)))
}

fn parse_positive(what: &str, value: &str) -> Result<usize, std::io::Error> {
    match parse_number::<usize>(what, value)? {
        0 => Err(invalid_input(format!("Invalid {}: must be greater than 0", what))),
        n => Ok(n),
    }
}
