use std::fmt;

/// RADIUS packet codes (RFC 2865 Section 4, RFC 2866, RFC 3575, RFC 5176, RFC 5997)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// Access-Request (1)
    AccessRequest,
    /// Access-Accept (2)
    AccessAccept,
    /// Access-Reject (3)
    AccessReject,
    /// Accounting-Request (4) - RFC 2866
    AccountingRequest,
    /// Accounting-Response (5) - RFC 2866
    AccountingResponse,
    /// Accounting-Status (6)
    AccountingStatus,
    /// Password-Request (7)
    PasswordRequest,
    /// Password-Accept (8)
    PasswordAccept,
    /// Password-Reject (9)
    PasswordReject,
    /// Accounting-Message (10)
    AccountingMessage,
    /// Access-Challenge (11)
    AccessChallenge,
    /// Status-Server (12) - RFC 5997
    StatusServer,
    /// Status-Client (13) - RFC 5997
    StatusClient,
    /// Disconnect-Request (40) - RFC 5176
    DisconnectRequest,
    /// Disconnect-ACK (41) - RFC 5176
    DisconnectAck,
    /// Disconnect-NAK (42) - RFC 5176
    DisconnectNak,
    /// CoA-Request (43) - RFC 5176
    CoaRequest,
    /// CoA-ACK (44) - RFC 5176
    CoaAck,
    /// CoA-NAK (45) - RFC 5176
    CoaNak,
    /// Status-Request (46)
    StatusRequest,
    /// Status-Accept (47)
    StatusAccept,
    /// Status-Reject (48)
    StatusReject,
    /// Reserved (255)
    Reserved,
    /// Any other code
    Unknown(u8),
}

impl Code {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Code::AccessRequest,
            2 => Code::AccessAccept,
            3 => Code::AccessReject,
            4 => Code::AccountingRequest,
            5 => Code::AccountingResponse,
            6 => Code::AccountingStatus,
            7 => Code::PasswordRequest,
            8 => Code::PasswordAccept,
            9 => Code::PasswordReject,
            10 => Code::AccountingMessage,
            11 => Code::AccessChallenge,
            12 => Code::StatusServer,
            13 => Code::StatusClient,
            40 => Code::DisconnectRequest,
            41 => Code::DisconnectAck,
            42 => Code::DisconnectNak,
            43 => Code::CoaRequest,
            44 => Code::CoaAck,
            45 => Code::CoaNak,
            46 => Code::StatusRequest,
            47 => Code::StatusAccept,
            48 => Code::StatusReject,
            255 => Code::Reserved,
            other => Code::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Code::AccessRequest => 1,
            Code::AccessAccept => 2,
            Code::AccessReject => 3,
            Code::AccountingRequest => 4,
            Code::AccountingResponse => 5,
            Code::AccountingStatus => 6,
            Code::PasswordRequest => 7,
            Code::PasswordAccept => 8,
            Code::PasswordReject => 9,
            Code::AccountingMessage => 10,
            Code::AccessChallenge => 11,
            Code::StatusServer => 12,
            Code::StatusClient => 13,
            Code::DisconnectRequest => 40,
            Code::DisconnectAck => 41,
            Code::DisconnectNak => 42,
            Code::CoaRequest => 43,
            Code::CoaAck => 44,
            Code::CoaNak => 45,
            Code::StatusRequest => 46,
            Code::StatusAccept => 47,
            Code::StatusReject => 48,
            Code::Reserved => 255,
            Code::Unknown(value) => value,
        }
    }

    /// Diagnostic name, e.g. `Access-Request` or `Unknown (99)`
    pub fn name(self) -> String {
        let name = match self {
            Code::AccessRequest => "Access-Request",
            Code::AccessAccept => "Access-Accept",
            Code::AccessReject => "Access-Reject",
            Code::AccountingRequest => "Accounting-Request",
            Code::AccountingResponse => "Accounting-Response",
            Code::AccountingStatus => "Accounting-Status",
            Code::PasswordRequest => "Password-Request",
            Code::PasswordAccept => "Password-Accept",
            Code::PasswordReject => "Password-Reject",
            Code::AccountingMessage => "Accounting-Message",
            Code::AccessChallenge => "Access-Challenge",
            Code::StatusServer => "Status-Server",
            Code::StatusClient => "Status-Client",
            Code::DisconnectRequest => "Disconnect-Request",
            Code::DisconnectAck => "Disconnect-ACK",
            Code::DisconnectNak => "Disconnect-NAK",
            Code::CoaRequest => "CoA-Request",
            Code::CoaAck => "CoA-ACK",
            Code::CoaNak => "CoA-NAK",
            Code::StatusRequest => "Status-Request",
            Code::StatusAccept => "Status-Accept",
            Code::StatusReject => "Status-Reject",
            Code::Reserved => "Reserved",
            Code::Unknown(value) => return format!("Unknown ({})", value),
        };
        name.to_string()
    }
}

impl From<u8> for Code {
    fn from(value: u8) -> Self {
        Code::from_u8(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
