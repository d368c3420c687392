/// Longest single label permitted on the wire (RFC 1035 §2.3.4)
pub const MAX_LABEL_LEN: usize = 63;

/// Longest encoded domain name, including length octets and the root label
pub const MAX_NAME_LEN: usize = 255;

/// Compression pointers followed before a name is rejected as looping
pub const MAX_POINTER_JUMPS: usize = 16;

/// Largest response sent over UDP to a client without EDNS
pub const MAX_UDP_PAYLOAD: usize = 512;

/// Fixed DNS header size in octets
pub const HEADER_LEN: usize = 12;
