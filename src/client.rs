use std::thread;

use log::debug;

use crate::config::ClientConfig;
use crate::connection::{Connection, Connector, TcpConnector};
use crate::error::Result;
use crate::levels::{ChannelLevels, Preset, PresetSelector};
use crate::protocol::{Command, STATUS_REPLY_LEN};

/// Controls one LED controller over one TCP session.
///
/// All operations block for at most the configured timeout. The client
/// is meant to be driven from one thread; operations take `&mut self`, so
/// sharing it requires an outer lock.
///
/// State changes are fire-and-forget: the device does not acknowledge
/// them, only `get_status` reads a reply.
pub struct DeviceClient<C: Connector = TcpConnector> {
    connection: Connection<C>,
    config: ClientConfig,
}

impl DeviceClient<TcpConnector> {
    /// Connects to the controller at `host` on port 5577 with keep-alive on.
    pub fn connect(host: &str) -> Result<DeviceClient> {
        return DeviceClient::connect_with(host, ClientConfig::default());
    }

    pub fn connect_with(host: &str, config: ClientConfig) -> Result<DeviceClient> {
        let connector = TcpConnector::new(host, config.timeout);
        return DeviceClient::with_connector(connector, config);
    }
}

impl<C: Connector> DeviceClient<C> {
    /// Opens the session and, unless disabled in `config`, runs the
    /// initialization sequence. Any failure is returned and no session is
    /// left open.
    pub fn with_connector(connector: C, config: ClientConfig) -> Result<DeviceClient<C>> {
        let connection = Connection::open(connector, config.stale_after)?;
        let mut client = DeviceClient { connection, config };
        if client.config.initialize {
            client.initialize()?;
        }
        return Ok(client);
    }

    // Some firmware revisions ignore state changes until they have seen a
    // level write, so flash full white once and go dark again.
    fn initialize(&mut self) -> Result<()> {
        debug!("initializing {}", self.address());
        self.turn_on()?;
        self.set_levels(ChannelLevels::white(255))?;
        thread::sleep(self.config.init_pause);
        self.set_levels(ChannelLevels::off())?;
        return Ok(());
    }

    pub fn turn_on(&mut self) -> Result<()> {
        self.execute(Command::TurnOn)
    }

    pub fn turn_off(&mut self) -> Result<()> {
        self.execute(Command::TurnOff)
    }

    /// Returns the raw status reply, at most 14 bytes. The layout depends
    /// on the controller model and is left to the caller.
    pub fn get_status(&mut self) -> Result<Vec<u8>> {
        let frame = Command::QueryStatus.encode();
        self.connection.send(&frame)?;
        let mut reply = [0u8; STATUS_REPLY_LEN];
        let n = self.connection.receive(&mut reply)?;
        if !self.config.keep_alive {
            self.connection.close();
        }
        return Ok(reply[..n].to_vec());
    }

    /// Sets absolute channel levels. Values are clamped to 0-255 and a
    /// missing white channel is sent as 0.
    pub fn update_device(&mut self, red: i32, green: i32, blue: i32, white: Option<i32>) -> Result<()> {
        self.set_levels(ChannelLevels::new(red, green, blue, white))
    }

    pub fn set_levels(&mut self, levels: ChannelLevels) -> Result<()> {
        self.execute(Command::SetLevels(levels))
    }

    pub fn set_rgb(&mut self, red: i32, green: i32, blue: i32) -> Result<()> {
        self.update_device(red, green, blue, None)
    }

    pub fn set_white(&mut self, level: i32) -> Result<()> {
        self.set_levels(ChannelLevels::white(level))
    }

    /// Starts a built-in effect. `preset_id` is clamped to 37-56 and
    /// `speed` to 0-100.
    pub fn send_preset(&mut self, preset_id: i32, speed: i32) -> Result<()> {
        self.execute(Command::Preset(PresetSelector::new(preset_id, speed)))
    }

    pub fn set_preset(&mut self, preset: Preset, speed: i32) -> Result<()> {
        self.send_preset(preset.id() as i32, speed)
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        debug!("{} -> {}", command.name(), self.address());
        self.send_bytes(&command.encode())
    }

    fn send_bytes(&mut self, frame: &[u8]) -> Result<()> {
        self.connection.send(frame)?;
        if !self.config.keep_alive {
            self.connection.close();
        }
        return Ok(());
    }

    /// Drops the session; the next operation opens a new one.
    pub fn close(&mut self) {
        self.connection.close();
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    pub fn keep_alive(&self) -> bool {
        self.config.keep_alive
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn address(&self) -> &str {
        self.connection.address()
    }
}
