use std::io::Write;

use anyhow::bail;
use clap::Parser;

use magichome::args::ShellArgs;
use magichome::{DeviceClient, Preset};

const HELP: &str = "Valid commands are: on, off, status, quit, rgb=R,G,B, white=NUM, \
                    levels=R,G,B,W, speed=NUM, preset=NAME|ID";

macro_rules! skip_fail {
    ($res:expr) => {
        match $res {
            Ok(val) => val,
            Err(e) => {
                println!("Invalid value: {}", e);
                continue;
            }
        }
    };
}

fn parse_channels(value: &str, count: usize) -> anyhow::Result<Vec<i32>> {
    let channels = value
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<i32>, _>>()?;
    if channels.len() != count {
        bail!("expected {} comma separated numbers", count);
    }
    return Ok(channels);
}

fn parse_preset(value: &str) -> anyhow::Result<i32> {
    if let Ok(id) = value.parse::<i32>() {
        return Ok(id);
    }
    let preset: Preset = value.parse()?;
    return Ok(preset.id() as i32);
}

/// A shell for interactive debugging.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = ShellArgs::parse();
    let config = args.client_config()?;
    let mut device = DeviceClient::connect_with(&args.host, config)?;
    println!("connected to {}", device.address());

    let mut speed = 50;
    let mut input = String::new();
    loop {
        print!("magichome> ");
        std::io::stdout().flush()?;
        input.clear();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        let result = match line.split_once('=') {
            None => match line {
                "" => continue,
                "help" => {
                    println!("{}", HELP);
                    continue;
                }
                "quit" | "exit" => break,
                "on" => device.turn_on(),
                "off" => device.turn_off(),
                "status" => device.get_status().map(|reply| println!("{:02x?}", reply)),
                _ => {
                    println!("unknown command {}", line);
                    continue;
                }
            },
            Some((key, value)) => match key.trim() {
                "rgb" => {
                    let c = skip_fail!(parse_channels(value, 3));
                    device.set_rgb(c[0], c[1], c[2])
                }
                "white" => device.set_white(skip_fail!(value.trim().parse::<i32>())),
                "levels" => {
                    let c = skip_fail!(parse_channels(value, 4));
                    device.update_device(c[0], c[1], c[2], Some(c[3]))
                }
                "speed" => {
                    speed = skip_fail!(value.trim().parse::<i32>());
                    continue;
                }
                "preset" => device.send_preset(skip_fail!(parse_preset(value.trim())), speed),
                _ => {
                    println!("unknown key {}", key);
                    continue;
                }
            },
        };
        if let Err(e) = result {
            println!("error: {}", e);
        }
    }
    return Ok(());
}
