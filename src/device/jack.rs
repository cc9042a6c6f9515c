use tracing::{debug, error, info, warn};

pub fn print_jack_info(client: &jack::Client) -> (usize, usize) {
    let sample_rate = client.sample_rate();
    let buffer_size = client.buffer_size();
    info!("JACK Server Info:");
    info!("  Sample Rate: {} Hz", sample_rate);
    info!("  Buffer Size: {} samples", buffer_size);
    info!(
        "  Buffer Duration: {:.2} ms",
        (buffer_size as f64 / sample_rate as f64) * 1000.0
    );
    (sample_rate as usize, buffer_size as usize)
}

/// Connects a mono output port to the first two physical playback ports
/// so it is heard on both speakers. Returns how many links were made.
pub fn connect_output_to_system_inputs(
    client: &jack::Client,
    out_port_name: &str,
) -> usize {
    let system_input_ports = client.ports(
        None,
        None,
        jack::PortFlags::IS_INPUT | jack::PortFlags::IS_PHYSICAL,
    );
    debug!("{} physical input found.", system_input_ports.len());

    if system_input_ports.is_empty() {
        warn!("Missing physical playback ports");
        return 0;
    }

    let mut connected = 0;
    for system_in in system_input_ports.iter().take(2) {
        match client.connect_ports_by_name(out_port_name, system_in) {
            Ok(_) => {
                info!("Connected Output: {} -> {}", out_port_name, system_in);
                connected += 1;
            }
            Err(e) => error!(
                "Failed connecting Output {} -> {}: {}",
                out_port_name, system_in, e
            ),
        }
    }
    connected
}
