//! Encode a record, frame it with nshead, then read it back

use std::io::Cursor;

use mcpack::{NsHead, Packet, bind, project};

mcpack::record! {
    #[derive(Debug, PartialEq)]
    struct Greeting {
        required text: String,
        optional repeat: u8,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("mcpack round trip");
    println!("=================\n");

    let greeting = Greeting {
        text: "ping".to_owned(),
        repeat: Some(3),
    };

    // Encode and frame
    let packet = Packet::from_value(
        NsHead::with_random_log_id(1, 1).with_provider("demo"),
        &project(&greeting),
    )?;
    let wire = packet.to_bytes()?;
    println!(
        "Framed {} body bytes into {} bytes (log id {})",
        packet.body().len(),
        wire.len(),
        packet.header().log_id()
    );

    // Read and decode
    let read = Packet::read_from(Cursor::new(wire))?;
    let Some(value) = read.decode_body()? else {
        return Err("empty body".into());
    };
    println!("Decoded value: {value:?}");

    let decoded: Greeting = bind(&value)?;
    println!("Bound record: {decoded:?}");
    assert_eq!(decoded, greeting);

    Ok(())
}
