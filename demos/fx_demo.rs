//! Example: a round of reads, writes and forces against an FX PLC
//!
//! Run with: cargo run --example fx_demo -- /dev/ttyUSB0
//!
//! Set `RUST_LOG=fx_link=trace` to see every frame on the wire.
//!
//! This example demonstrates:
//! - Configuring the serial link
//! - Reading and writing 16-bit registers
//! - Reading bit devices
//! - Packing 32-bit values into a register block
//! - Forcing a single bit

use fx_link::numeric::{encode_f32, encode_i32, encode_u32, parse_f32, parse_i32, parse_u32};
use fx_link::{Client, RegisterKind, SerialConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> fx_link::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // =========================================================================
    // Connect to PLC
    // =========================================================================

    let port = std::env::args().nth(1).unwrap_or_else(|| "COM5".to_string());
    let config = SerialConfig::new(port)
        .with_baud_rate(38400)
        .with_timeout(Duration::from_millis(1000));
    let client = Client::serial(config);
    client.open()?;

    // =========================================================================
    // 16-bit registers
    // =========================================================================

    println!("=== Registers ===\n");

    client.write_words(RegisterKind::Data, 20, &[1000, 2000])?;
    println!("D20-D21 <- [1000, 2000]");

    let counters = client.read_words(RegisterKind::Counter16, 6, 3)?;
    println!("C6-C8 = {:?}", counters);

    // =========================================================================
    // Bit devices
    // =========================================================================

    println!("\n=== Bits ===\n");

    let outputs = client.read_bits(RegisterKind::OutputContact, 10, 2)?;
    println!("Y10-Y11 = {:?}", outputs);

    // =========================================================================
    // 32-bit values in a register block
    // =========================================================================

    println!("\n=== Register Pairs ===\n");

    let mut block = [0u16; 6];
    encode_f32(&mut block, 0, 1.25)?;
    encode_u32(&mut block, 2, 150_000)?;
    encode_i32(&mut block, 4, -160_000)?;
    client.write_words(RegisterKind::Data, 0, &block)?;

    let data = client.read_words(RegisterKind::Data, 0, 8)?;
    println!("D0-D1 (f32) = {}", parse_f32(&data, 0)?);
    println!("D2-D3 (u32) = {}", parse_u32(&data, 2)?);
    println!("D4-D5 (i32) = {}", parse_i32(&data, 4)?);

    // =========================================================================
    // Forced bits
    // =========================================================================

    println!("\n=== Force ===\n");

    client.force_bit(RegisterKind::MemoryContact, 500, true)?;
    println!("M500 forced ON");

    client.close()?;
    Ok(())
}
