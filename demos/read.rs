//! Print messages read from a serial port.

use grobot_msg::{message::Address, port::Port};
use simple_logger::SimpleLogger;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Enable logging
    SimpleLogger::new().init().unwrap();

    // Open the port and give each frame half a second to arrive in full.
    let mut port = Port::open_serial_options()
        .timeout(Some(Duration::from_millis(500)))
        .open("/dev/ttyUSB0")?;

    // Print every message addressed to the prime controller until a STOP arrives.
    loop {
        let message = match port.read_message() {
            Ok(message) => message,
            // Nothing arrived, or a frame stalled part way through.
            Err(e) if e.is_timeout() => continue,
            Err(e) => return Err(e.into()),
        };
        match message.dest_address() {
            Address::Prime | Address::Broadcast => {}
            _ => continue,
        }
        println!(
            "{} from {:?}: {:?}",
            message.command(),
            message.source_address(),
            message.fields()
        );
        if message.command() == "STOP" {
            break;
        }
    }
    Ok(())
}
