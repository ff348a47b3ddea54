use clap::Parser;
use huddle_core::IceServerConfig;
use std::net::SocketAddr;

pub const DEFAULT_MAX_PARTICIPANTS: usize = 8;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_participants: usize,
    /// Handed to clients by `GET /api/ice-servers`.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            ice_servers: IceServerConfig::default_stun(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "huddle-server", about = "Room allocation and relay server for huddle calls")]
pub struct Args {
    #[arg(long, env = "HUDDLE_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    #[arg(long, env = "HUDDLE_MAX_PARTICIPANTS", default_value_t = DEFAULT_MAX_PARTICIPANTS)]
    pub max_participants: usize,

    /// STUN/TURN URL, repeatable. Defaults to a public STUN server.
    #[arg(long = "ice-server", env = "HUDDLE_ICE_SERVERS", value_delimiter = ',')]
    pub ice_servers: Vec<String>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        let ice_servers = if args.ice_servers.is_empty() {
            IceServerConfig::default_stun()
        } else {
            args.ice_servers.into_iter().map(IceServerConfig::stun).collect()
        };

        Self {
            bind: args.bind,
            max_participants: args.max_participants.max(1),
            ice_servers,
        }
    }
}
