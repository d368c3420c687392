use bitstream_io::{BitRead, BitReader, BitWrite, BitWriter, Endianness};

use super::ParseError;
use super::constants::{MAX_LABEL_LEN, MAX_NAME_LEN, MAX_POINTER_JUMPS};

pub trait PacketComponent {
    fn write<E: Endianness>(
        &self,
        writer: &mut BitWriter<&mut Vec<u8>, E>,
    ) -> Result<(), ParseError>;

    /// Read the component. `packet_buf` is the whole message, used to
    /// resolve compression pointers.
    fn read<E: Endianness>(
        &mut self,
        reader: &mut BitReader<&[u8], E>,
        packet_buf: &[u8],
    ) -> Result<(), ParseError>;

    /// Read a domain name, leaf label first. The root label is not included.
    fn read_labels<E: Endianness>(
        &self,
        reader: &mut BitReader<&[u8], E>,
        packet_buf: &[u8],
    ) -> Result<Vec<String>, ParseError> {
        let mut labels = Vec::new();
        let mut name_len = 1;
        loop {
            let len = reader.read_var::<u8>(8)?;
            if len == 0 {
                break;
            }
            match len & 0xC0 {
                0x00 => {
                    let mut buf = vec![0; len as usize];
                    reader.read_bytes(&mut buf)?;
                    push_label(&mut labels, &mut name_len, buf)?;
                }
                0xC0 => {
                    let low = reader.read_var::<u8>(8)?;
                    let offset = (((len & 0x3F) as usize) << 8) | low as usize;
                    follow_pointer(packet_buf, offset, &mut labels, &mut name_len)?;
                    break;
                }
                _ => return Err(ParseError::InvalidLabel),
            }
        }

        Ok(labels)
    }

    fn write_labels<E: Endianness>(
        &self,
        writer: &mut BitWriter<&mut Vec<u8>, E>,
        labels: &[String],
    ) -> Result<(), ParseError> {
        for label in labels.iter().filter(|l| !l.is_empty()) {
            let raw = label_octets(label)?;
            if raw.len() > MAX_LABEL_LEN {
                return Err(ParseError::InvalidLabel);
            }
            writer.write_var::<u8>(8, raw.len() as u8)?;
            writer.write_bytes(&raw)?;
        }
        writer.write_var::<u8>(8, 0)?;

        Ok(())
    }
}

fn push_label(
    labels: &mut Vec<String>,
    name_len: &mut usize,
    raw: Vec<u8>,
) -> Result<(), ParseError> {
    *name_len += raw.len() + 1;
    if *name_len > MAX_NAME_LEN {
        return Err(ParseError::NameTooLong);
    }
    labels.push(raw.into_iter().map(char::from).collect());
    Ok(())
}

/// Label octets back from their one-char-per-octet form. Labels are held
/// as ISO 8859-1 text so any octet survives being echoed in a response.
fn label_octets(label: &str) -> Result<Vec<u8>, ParseError> {
    label
        .chars()
        .map(|c| u8::try_from(c).map_err(|_| ParseError::InvalidLabel))
        .collect()
}

/// Continue a compressed name from `offset` in the full message.
fn follow_pointer(
    packet_buf: &[u8],
    mut offset: usize,
    labels: &mut Vec<String>,
    name_len: &mut usize,
) -> Result<(), ParseError> {
    let mut jumps = 1;
    loop {
        let len = *packet_buf.get(offset).ok_or(ParseError::InvalidLabel)?;
        match len & 0xC0 {
            0x00 if len == 0 => return Ok(()),
            0x00 => {
                let start = offset + 1;
                let end = start + len as usize;
                let raw = packet_buf
                    .get(start..end)
                    .ok_or(ParseError::InvalidLabel)?
                    .to_vec();
                push_label(labels, name_len, raw)?;
                offset = end;
            }
            0xC0 => {
                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(ParseError::PointerLoop);
                }
                let low = *packet_buf.get(offset + 1).ok_or(ParseError::InvalidLabel)?;
                offset = (((len & 0x3F) as usize) << 8) | low as usize;
            }
            _ => return Err(ParseError::InvalidLabel),
        }
    }
}
