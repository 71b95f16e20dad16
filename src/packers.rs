//! L6: fan-out/fan-in between a flat slot array and the wire's
//! multi-packet framing (spec.md §4.6).
//!
//! Each packer pre-fills every packet with `0xFF` before writing any
//! populated record, so the per-block codec's own emptiness sentinel is
//! what a freshly allocated, all-empty packer round-trips back to.

use crate::blocks::{channel, contact, rxgroup};
use crate::error::{Error, Result};

const CHANNEL_SLOTS: usize = 1024;
const CHANNEL_PACKETS: usize = 64;
const CHANNELS_PER_PACKET: usize = 16;
const CHANNEL_PACKET_LEN: usize = CHANNELS_PER_PACKET * channel::LEN;

const CONTACT_SLOTS: usize = 4000;
const CONTACT_PACKETS: usize = 80;
const CONTACTS_PER_PACKET: usize = 50;
const CONTACT_PACKET_LEN: usize = CONTACTS_PER_PACKET * contact::LEN;

const RXGROUP_SLOTS: usize = 32;
const RXGROUP_PACKETS: usize = 4;
const RXGROUPS_PER_PACKET: usize = 8;
const RXGROUP_PACKET_LEN: usize = RXGROUPS_PER_PACKET * rxgroup::LEN;

fn check_packet_count(path: &str, packets: &[Vec<u8>], expected: usize) -> Result<()> {
    if packets.len() != expected {
        return Err(Error::codec(
            path,
            format!("expected {expected} packets, got {}", packets.len()),
        ));
    }
    Ok(())
}

pub fn pack_channels(path: &str, slots: &[Option<channel::Channel>]) -> Result<Vec<Vec<u8>>> {
    if slots.len() != CHANNEL_SLOTS {
        return Err(Error::codec(path, format!("expected {CHANNEL_SLOTS} channel slots")));
    }
    let mut packets = vec![vec![0xFFu8; CHANNEL_PACKET_LEN]; CHANNEL_PACKETS];
    for (k, slot) in slots.iter().enumerate() {
        if let Some(ch) = slot {
            let packet = k / CHANNELS_PER_PACKET;
            let offset = (k % CHANNELS_PER_PACKET) * channel::LEN;
            let encoded = channel::encode(&format!("{path}[{k}]"), ch)?;
            packets[packet][offset..offset + channel::LEN].copy_from_slice(&encoded);
        }
    }
    Ok(packets)
}

pub fn unpack_channels(path: &str, packets: &[Vec<u8>]) -> Result<Vec<Option<channel::Channel>>> {
    check_packet_count(path, packets, CHANNEL_PACKETS)?;
    let mut slots = Vec::with_capacity(CHANNEL_SLOTS);
    for k in 0..CHANNEL_SLOTS {
        let packet = &packets[k / CHANNELS_PER_PACKET];
        let offset = (k % CHANNELS_PER_PACKET) * channel::LEN;
        let record = &packet[offset..offset + channel::LEN];
        slots.push(channel::decode(&format!("{path}[{k}]"), record)?);
    }
    Ok(slots)
}

pub fn pack_contacts(path: &str, slots: &[Option<contact::Contact>]) -> Result<Vec<Vec<u8>>> {
    if slots.len() != CONTACT_SLOTS {
        return Err(Error::codec(path, format!("expected {CONTACT_SLOTS} contact slots")));
    }
    let mut packets = vec![vec![0xFFu8; CONTACT_PACKET_LEN]; CONTACT_PACKETS];
    for (k, slot) in slots.iter().enumerate() {
        if let Some(c) = slot {
            let packet = k / CONTACTS_PER_PACKET;
            let offset = (k % CONTACTS_PER_PACKET) * contact::LEN;
            let encoded = contact::encode(&format!("{path}[{k}]"), c)?;
            packets[packet][offset..offset + contact::LEN].copy_from_slice(&encoded);
        }
    }
    Ok(packets)
}

pub fn unpack_contacts(path: &str, packets: &[Vec<u8>]) -> Result<Vec<Option<contact::Contact>>> {
    check_packet_count(path, packets, CONTACT_PACKETS)?;
    let mut slots = Vec::with_capacity(CONTACT_SLOTS);
    for k in 0..CONTACT_SLOTS {
        let packet = &packets[k / CONTACTS_PER_PACKET];
        let offset = (k % CONTACTS_PER_PACKET) * contact::LEN;
        let record = &packet[offset..offset + contact::LEN];
        slots.push(contact::decode(&format!("{path}[{k}]"), record)?);
    }
    Ok(slots)
}

pub fn pack_rx_groups(path: &str, slots: &[Option<rxgroup::RxGroup>]) -> Result<Vec<Vec<u8>>> {
    if slots.len() != RXGROUP_SLOTS {
        return Err(Error::codec(path, format!("expected {RXGROUP_SLOTS} rx group slots")));
    }
    let mut packets = vec![vec![0xFFu8; RXGROUP_PACKET_LEN]; RXGROUP_PACKETS];
    for (k, slot) in slots.iter().enumerate() {
        if let Some(g) = slot {
            let packet = k / RXGROUPS_PER_PACKET;
            let offset = (k % RXGROUPS_PER_PACKET) * rxgroup::LEN;
            let encoded = rxgroup::encode(&format!("{path}[{k}]"), g)?;
            packets[packet][offset..offset + rxgroup::LEN].copy_from_slice(&encoded);
        }
    }
    Ok(packets)
}

pub fn unpack_rx_groups(path: &str, packets: &[Vec<u8>]) -> Result<Vec<Option<rxgroup::RxGroup>>> {
    check_packet_count(path, packets, RXGROUP_PACKETS)?;
    let mut slots = Vec::with_capacity(RXGROUP_SLOTS);
    for k in 0..RXGROUP_SLOTS {
        let packet = &packets[k / RXGROUPS_PER_PACKET];
        let offset = (k % RXGROUPS_PER_PACKET) * rxgroup::LEN;
        let record = &packet[offset..offset + rxgroup::LEN];
        slots.push(rxgroup::decode(&format!("{path}[{k}]"), record)?);
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec.md §8 scenario 10.
    #[test]
    fn empty_channel_packer_round_trips() {
        let slots = vec![None; CHANNEL_SLOTS];
        let packets = pack_channels("ch", &slots).unwrap();
        assert_eq!(packets.len(), CHANNEL_PACKETS);
        for packet in &packets {
            assert_eq!(packet.len(), CHANNEL_PACKET_LEN);
            assert!(packet.iter().all(|&b| b == 0xFF));
        }
        assert_eq!(unpack_channels("ch", &packets).unwrap(), slots);
    }

    #[test]
    fn channel_slot_lands_in_documented_packet_and_offset() {
        let mut fixture = [0x00u8; channel::LEN];
        fixture[0] = 0x01;
        let mut slots = vec![None; CHANNEL_SLOTS];
        slots[17] = channel::decode("x", &fixture).unwrap();
        let packets = pack_channels("ch", &slots).unwrap();
        // slot 17 -> packet 1, offset (17 % 16) * 64 = 64
        assert_ne!(&packets[1][64..64 + channel::LEN], &[0xFFu8; channel::LEN][..]);
        assert_eq!(&packets[0], &vec![0xFFu8; CHANNEL_PACKET_LEN]);
    }

    #[test]
    fn empty_contact_and_rxgroup_packers_round_trip() {
        let contacts = vec![None; CONTACT_SLOTS];
        let packets = pack_contacts("c", &contacts).unwrap();
        assert_eq!(packets.len(), CONTACT_PACKETS);
        assert_eq!(unpack_contacts("c", &packets).unwrap(), contacts);

        let groups = vec![None; RXGROUP_SLOTS];
        let packets = pack_rx_groups("g", &groups).unwrap();
        assert_eq!(packets.len(), RXGROUP_PACKETS);
        assert_eq!(unpack_rx_groups("g", &packets).unwrap(), groups);
    }
}
