use crate::dictionary::DataKind;

/// Standard RADIUS attribute codes as defined in RFC 2865, RFC 2866 and related RFCs
///
/// Used to seed [`MemoryDictionary::standard`](crate::dictionary::MemoryDictionary::standard)
/// and as named constants when building packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StandardAttribute {
    /// User-Name (1) - RFC 2865
    UserName = 1,
    /// User-Password (2) - RFC 2865
    UserPassword = 2,
    /// CHAP-Password (3) - RFC 2865
    ChapPassword = 3,
    /// NAS-IP-Address (4) - RFC 2865
    NasIpAddress = 4,
    /// NAS-Port (5) - RFC 2865
    NasPort = 5,
    /// Service-Type (6) - RFC 2865
    ServiceType = 6,
    /// Framed-Protocol (7) - RFC 2865
    FramedProtocol = 7,
    /// Framed-IP-Address (8) - RFC 2865
    FramedIpAddress = 8,
    /// Framed-IP-Netmask (9) - RFC 2865
    FramedIpNetmask = 9,
    /// Framed-Routing (10) - RFC 2865
    FramedRouting = 10,
    /// Filter-Id (11) - RFC 2865
    FilterId = 11,
    /// Framed-MTU (12) - RFC 2865
    FramedMtu = 12,
    /// Framed-Compression (13) - RFC 2865
    FramedCompression = 13,
    /// Login-IP-Host (14) - RFC 2865
    LoginIpHost = 14,
    /// Login-Service (15) - RFC 2865
    LoginService = 15,
    /// Login-TCP-Port (16) - RFC 2865
    LoginTcpPort = 16,
    /// Reply-Message (18) - RFC 2865
    ReplyMessage = 18,
    /// Callback-Number (19) - RFC 2865
    CallbackNumber = 19,
    /// Callback-Id (20) - RFC 2865
    CallbackId = 20,
    /// Framed-Route (22) - RFC 2865
    FramedRoute = 22,
    /// Framed-IPX-Network (23) - RFC 2865
    FramedIpxNetwork = 23,
    /// State (24) - RFC 2865
    State = 24,
    /// Class (25) - RFC 2865
    Class = 25,
    /// Vendor-Specific (26) - RFC 2865
    VendorSpecific = 26,
    /// Session-Timeout (27) - RFC 2865
    SessionTimeout = 27,
    /// Idle-Timeout (28) - RFC 2865
    IdleTimeout = 28,
    /// Termination-Action (29) - RFC 2865
    TerminationAction = 29,
    /// Called-Station-Id (30) - RFC 2865
    CalledStationId = 30,
    /// Calling-Station-Id (31) - RFC 2865
    CallingStationId = 31,
    /// NAS-Identifier (32) - RFC 2865
    NasIdentifier = 32,
    /// Proxy-State (33) - RFC 2865
    ProxyState = 33,
    /// Login-LAT-Service (34) - RFC 2865
    LoginLatService = 34,
    /// Login-LAT-Node (35) - RFC 2865
    LoginLatNode = 35,
    /// Login-LAT-Group (36) - RFC 2865
    LoginLatGroup = 36,
    /// Framed-AppleTalk-Link (37) - RFC 2865
    FramedAppleTalkLink = 37,
    /// Framed-AppleTalk-Network (38) - RFC 2865
    FramedAppleTalkNetwork = 38,
    /// Framed-AppleTalk-Zone (39) - RFC 2865
    FramedAppleTalkZone = 39,
    /// Acct-Status-Type (40) - RFC 2866
    AcctStatusType = 40,
    /// Acct-Delay-Time (41) - RFC 2866
    AcctDelayTime = 41,
    /// Acct-Input-Octets (42) - RFC 2866
    AcctInputOctets = 42,
    /// Acct-Output-Octets (43) - RFC 2866
    AcctOutputOctets = 43,
    /// Acct-Session-Id (44) - RFC 2866
    AcctSessionId = 44,
    /// Acct-Authentic (45) - RFC 2866
    AcctAuthentic = 45,
    /// Acct-Session-Time (46) - RFC 2866
    AcctSessionTime = 46,
    /// Acct-Input-Packets (47) - RFC 2866
    AcctInputPackets = 47,
    /// Acct-Output-Packets (48) - RFC 2866
    AcctOutputPackets = 48,
    /// Acct-Terminate-Cause (49) - RFC 2866
    AcctTerminateCause = 49,
    /// Acct-Multi-Session-Id (50) - RFC 2866
    AcctMultiSessionId = 50,
    /// Acct-Link-Count (51) - RFC 2866
    AcctLinkCount = 51,
    /// Acct-Input-Gigawords (52) - RFC 2869
    AcctInputGigawords = 52,
    /// Acct-Output-Gigawords (53) - RFC 2869
    AcctOutputGigawords = 53,
    /// CHAP-Challenge (60) - RFC 2865
    ChapChallenge = 60,
    /// NAS-Port-Type (61) - RFC 2865
    NasPortType = 61,
    /// Port-Limit (62) - RFC 2865
    PortLimit = 62,
    /// Login-LAT-Port (63) - RFC 2865
    LoginLatPort = 63,
    /// EAP-Message (79) - RFC 3579
    EapMessage = 79,
    /// Message-Authenticator (80) - RFC 2869
    MessageAuthenticator = 80,
}

const SERVICE_TYPES: &[(u32, &str)] = &[
    (1, "Login-User"),
    (2, "Framed-User"),
    (3, "Callback-Login-User"),
    (4, "Callback-Framed-User"),
    (5, "Outbound-User"),
    (6, "Administrative-User"),
    (7, "NAS-Prompt-User"),
    (8, "Authenticate-Only"),
    (9, "Callback-NAS-Prompt"),
    (10, "Call-Check"),
    (11, "Callback-Administrative"),
];

const FRAMED_PROTOCOLS: &[(u32, &str)] = &[
    (1, "PPP"),
    (2, "SLIP"),
    (3, "ARAP"),
    (4, "Gandalf-SLML"),
    (5, "Xylogics-IPX-SLIP"),
    (6, "X.75-Synchronous"),
];

const ACCT_STATUS_TYPES: &[(u32, &str)] = &[
    (1, "Start"),
    (2, "Stop"),
    (3, "Interim-Update"),
    (7, "Accounting-On"),
    (8, "Accounting-Off"),
];

const ACCT_AUTHENTIC: &[(u32, &str)] = &[(1, "RADIUS"), (2, "Local"), (3, "Remote")];

const NAS_PORT_TYPES: &[(u32, &str)] = &[
    (0, "Async"),
    (1, "Sync"),
    (2, "ISDN"),
    (3, "ISDN-V120"),
    (4, "ISDN-V110"),
    (5, "Virtual"),
    (15, "Ethernet"),
    (19, "Wireless-802.11"),
];

const TERMINATION_ACTIONS: &[(u32, &str)] = &[(0, "Default"), (1, "RADIUS-Request")];

impl StandardAttribute {
    /// Every standard attribute, in code order
    pub const ALL: &'static [StandardAttribute] = &[
        StandardAttribute::UserName,
        StandardAttribute::UserPassword,
        StandardAttribute::ChapPassword,
        StandardAttribute::NasIpAddress,
        StandardAttribute::NasPort,
        StandardAttribute::ServiceType,
        StandardAttribute::FramedProtocol,
        StandardAttribute::FramedIpAddress,
        StandardAttribute::FramedIpNetmask,
        StandardAttribute::FramedRouting,
        StandardAttribute::FilterId,
        StandardAttribute::FramedMtu,
        StandardAttribute::FramedCompression,
        StandardAttribute::LoginIpHost,
        StandardAttribute::LoginService,
        StandardAttribute::LoginTcpPort,
        StandardAttribute::ReplyMessage,
        StandardAttribute::CallbackNumber,
        StandardAttribute::CallbackId,
        StandardAttribute::FramedRoute,
        StandardAttribute::FramedIpxNetwork,
        StandardAttribute::State,
        StandardAttribute::Class,
        StandardAttribute::VendorSpecific,
        StandardAttribute::SessionTimeout,
        StandardAttribute::IdleTimeout,
        StandardAttribute::TerminationAction,
        StandardAttribute::CalledStationId,
        StandardAttribute::CallingStationId,
        StandardAttribute::NasIdentifier,
        StandardAttribute::ProxyState,
        StandardAttribute::LoginLatService,
        StandardAttribute::LoginLatNode,
        StandardAttribute::LoginLatGroup,
        StandardAttribute::FramedAppleTalkLink,
        StandardAttribute::FramedAppleTalkNetwork,
        StandardAttribute::FramedAppleTalkZone,
        StandardAttribute::AcctStatusType,
        StandardAttribute::AcctDelayTime,
        StandardAttribute::AcctInputOctets,
        StandardAttribute::AcctOutputOctets,
        StandardAttribute::AcctSessionId,
        StandardAttribute::AcctAuthentic,
        StandardAttribute::AcctSessionTime,
        StandardAttribute::AcctInputPackets,
        StandardAttribute::AcctOutputPackets,
        StandardAttribute::AcctTerminateCause,
        StandardAttribute::AcctMultiSessionId,
        StandardAttribute::AcctLinkCount,
        StandardAttribute::AcctInputGigawords,
        StandardAttribute::AcctOutputGigawords,
        StandardAttribute::ChapChallenge,
        StandardAttribute::NasPortType,
        StandardAttribute::PortLimit,
        StandardAttribute::LoginLatPort,
        StandardAttribute::EapMessage,
        StandardAttribute::MessageAuthenticator,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(StandardAttribute::UserName),
            2 => Some(StandardAttribute::UserPassword),
            3 => Some(StandardAttribute::ChapPassword),
            4 => Some(StandardAttribute::NasIpAddress),
            5 => Some(StandardAttribute::NasPort),
            6 => Some(StandardAttribute::ServiceType),
            7 => Some(StandardAttribute::FramedProtocol),
            8 => Some(StandardAttribute::FramedIpAddress),
            9 => Some(StandardAttribute::FramedIpNetmask),
            10 => Some(StandardAttribute::FramedRouting),
            11 => Some(StandardAttribute::FilterId),
            12 => Some(StandardAttribute::FramedMtu),
            13 => Some(StandardAttribute::FramedCompression),
            14 => Some(StandardAttribute::LoginIpHost),
            15 => Some(StandardAttribute::LoginService),
            16 => Some(StandardAttribute::LoginTcpPort),
            18 => Some(StandardAttribute::ReplyMessage),
            19 => Some(StandardAttribute::CallbackNumber),
            20 => Some(StandardAttribute::CallbackId),
            22 => Some(StandardAttribute::FramedRoute),
            23 => Some(StandardAttribute::FramedIpxNetwork),
            24 => Some(StandardAttribute::State),
            25 => Some(StandardAttribute::Class),
            26 => Some(StandardAttribute::VendorSpecific),
            27 => Some(StandardAttribute::SessionTimeout),
            28 => Some(StandardAttribute::IdleTimeout),
            29 => Some(StandardAttribute::TerminationAction),
            30 => Some(StandardAttribute::CalledStationId),
            31 => Some(StandardAttribute::CallingStationId),
            32 => Some(StandardAttribute::NasIdentifier),
            33 => Some(StandardAttribute::ProxyState),
            34 => Some(StandardAttribute::LoginLatService),
            35 => Some(StandardAttribute::LoginLatNode),
            36 => Some(StandardAttribute::LoginLatGroup),
            37 => Some(StandardAttribute::FramedAppleTalkLink),
            38 => Some(StandardAttribute::FramedAppleTalkNetwork),
            39 => Some(StandardAttribute::FramedAppleTalkZone),
            40 => Some(StandardAttribute::AcctStatusType),
            41 => Some(StandardAttribute::AcctDelayTime),
            42 => Some(StandardAttribute::AcctInputOctets),
            43 => Some(StandardAttribute::AcctOutputOctets),
            44 => Some(StandardAttribute::AcctSessionId),
            45 => Some(StandardAttribute::AcctAuthentic),
            46 => Some(StandardAttribute::AcctSessionTime),
            47 => Some(StandardAttribute::AcctInputPackets),
            48 => Some(StandardAttribute::AcctOutputPackets),
            49 => Some(StandardAttribute::AcctTerminateCause),
            50 => Some(StandardAttribute::AcctMultiSessionId),
            51 => Some(StandardAttribute::AcctLinkCount),
            52 => Some(StandardAttribute::AcctInputGigawords),
            53 => Some(StandardAttribute::AcctOutputGigawords),
            60 => Some(StandardAttribute::ChapChallenge),
            61 => Some(StandardAttribute::NasPortType),
            62 => Some(StandardAttribute::PortLimit),
            63 => Some(StandardAttribute::LoginLatPort),
            79 => Some(StandardAttribute::EapMessage),
            80 => Some(StandardAttribute::MessageAuthenticator),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Dictionary name, e.g. `"User-Name"`
    pub fn name(self) -> &'static str {
        match self {
            StandardAttribute::UserName => "User-Name",
            StandardAttribute::UserPassword => "User-Password",
            StandardAttribute::ChapPassword => "CHAP-Password",
            StandardAttribute::NasIpAddress => "NAS-IP-Address",
            StandardAttribute::NasPort => "NAS-Port",
            StandardAttribute::ServiceType => "Service-Type",
            StandardAttribute::FramedProtocol => "Framed-Protocol",
            StandardAttribute::FramedIpAddress => "Framed-IP-Address",
            StandardAttribute::FramedIpNetmask => "Framed-IP-Netmask",
            StandardAttribute::FramedRouting => "Framed-Routing",
            StandardAttribute::FilterId => "Filter-Id",
            StandardAttribute::FramedMtu => "Framed-MTU",
            StandardAttribute::FramedCompression => "Framed-Compression",
            StandardAttribute::LoginIpHost => "Login-IP-Host",
            StandardAttribute::LoginService => "Login-Service",
            StandardAttribute::LoginTcpPort => "Login-TCP-Port",
            StandardAttribute::ReplyMessage => "Reply-Message",
            StandardAttribute::CallbackNumber => "Callback-Number",
            StandardAttribute::CallbackId => "Callback-Id",
            StandardAttribute::FramedRoute => "Framed-Route",
            StandardAttribute::FramedIpxNetwork => "Framed-IPX-Network",
            StandardAttribute::State => "State",
            StandardAttribute::Class => "Class",
            StandardAttribute::VendorSpecific => "Vendor-Specific",
            StandardAttribute::SessionTimeout => "Session-Timeout",
            StandardAttribute::IdleTimeout => "Idle-Timeout",
            StandardAttribute::TerminationAction => "Termination-Action",
            StandardAttribute::CalledStationId => "Called-Station-Id",
            StandardAttribute::CallingStationId => "Calling-Station-Id",
            StandardAttribute::NasIdentifier => "NAS-Identifier",
            StandardAttribute::ProxyState => "Proxy-State",
            StandardAttribute::LoginLatService => "Login-LAT-Service",
            StandardAttribute::LoginLatNode => "Login-LAT-Node",
            StandardAttribute::LoginLatGroup => "Login-LAT-Group",
            StandardAttribute::FramedAppleTalkLink => "Framed-AppleTalk-Link",
            StandardAttribute::FramedAppleTalkNetwork => "Framed-AppleTalk-Network",
            StandardAttribute::FramedAppleTalkZone => "Framed-AppleTalk-Zone",
            StandardAttribute::AcctStatusType => "Acct-Status-Type",
            StandardAttribute::AcctDelayTime => "Acct-Delay-Time",
            StandardAttribute::AcctInputOctets => "Acct-Input-Octets",
            StandardAttribute::AcctOutputOctets => "Acct-Output-Octets",
            StandardAttribute::AcctSessionId => "Acct-Session-Id",
            StandardAttribute::AcctAuthentic => "Acct-Authentic",
            StandardAttribute::AcctSessionTime => "Acct-Session-Time",
            StandardAttribute::AcctInputPackets => "Acct-Input-Packets",
            StandardAttribute::AcctOutputPackets => "Acct-Output-Packets",
            StandardAttribute::AcctTerminateCause => "Acct-Terminate-Cause",
            StandardAttribute::AcctMultiSessionId => "Acct-Multi-Session-Id",
            StandardAttribute::AcctLinkCount => "Acct-Link-Count",
            StandardAttribute::AcctInputGigawords => "Acct-Input-Gigawords",
            StandardAttribute::AcctOutputGigawords => "Acct-Output-Gigawords",
            StandardAttribute::ChapChallenge => "CHAP-Challenge",
            StandardAttribute::NasPortType => "NAS-Port-Type",
            StandardAttribute::PortLimit => "Port-Limit",
            StandardAttribute::LoginLatPort => "Login-LAT-Port",
            StandardAttribute::EapMessage => "EAP-Message",
            StandardAttribute::MessageAuthenticator => "Message-Authenticator",
        }
    }

    /// Declared value kind; address and binary types are carried as octets
    pub fn kind(self) -> DataKind {
        match self {
            StandardAttribute::NasPort
            | StandardAttribute::ServiceType
            | StandardAttribute::FramedProtocol
            | StandardAttribute::FramedRouting
            | StandardAttribute::FramedMtu
            | StandardAttribute::FramedCompression
            | StandardAttribute::LoginService
            | StandardAttribute::LoginTcpPort
            | StandardAttribute::SessionTimeout
            | StandardAttribute::IdleTimeout
            | StandardAttribute::TerminationAction
            | StandardAttribute::AcctStatusType
            | StandardAttribute::AcctDelayTime
            | StandardAttribute::AcctInputOctets
            | StandardAttribute::AcctOutputOctets
            | StandardAttribute::AcctAuthentic
            | StandardAttribute::AcctSessionTime
            | StandardAttribute::AcctInputPackets
            | StandardAttribute::AcctOutputPackets
            | StandardAttribute::AcctTerminateCause
            | StandardAttribute::AcctLinkCount
            | StandardAttribute::AcctInputGigawords
            | StandardAttribute::AcctOutputGigawords
            | StandardAttribute::NasPortType
            | StandardAttribute::PortLimit
            | StandardAttribute::FramedAppleTalkLink
            | StandardAttribute::FramedAppleTalkNetwork => DataKind::Integer,
            StandardAttribute::ChapPassword
            | StandardAttribute::NasIpAddress
            | StandardAttribute::FramedIpAddress
            | StandardAttribute::FramedIpNetmask
            | StandardAttribute::LoginIpHost
            | StandardAttribute::FramedIpxNetwork
            | StandardAttribute::State
            | StandardAttribute::Class
            | StandardAttribute::ProxyState
            | StandardAttribute::ChapChallenge
            | StandardAttribute::EapMessage
            | StandardAttribute::MessageAuthenticator => DataKind::Octets,
            StandardAttribute::VendorSpecific => DataKind::VendorSpecific,
            _ => DataKind::String,
        }
    }

    /// Named integer values declared for this attribute
    pub fn enumerations(self) -> &'static [(u32, &'static str)] {
        match self {
            StandardAttribute::ServiceType => SERVICE_TYPES,
            StandardAttribute::FramedProtocol => FRAMED_PROTOCOLS,
            StandardAttribute::TerminationAction => TERMINATION_ACTIONS,
            StandardAttribute::AcctStatusType => ACCT_STATUS_TYPES,
            StandardAttribute::AcctAuthentic => ACCT_AUTHENTIC,
            StandardAttribute::NasPortType => NAS_PORT_TYPES,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for attr in StandardAttribute::ALL {
            assert_eq!(StandardAttribute::from_u8(attr.as_u8()), Some(*attr));
        }
        assert_eq!(StandardAttribute::from_u8(17), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(StandardAttribute::UserName.kind(), DataKind::String);
        assert_eq!(StandardAttribute::ServiceType.kind(), DataKind::Integer);
        assert_eq!(StandardAttribute::ProxyState.kind(), DataKind::Octets);
        assert_eq!(StandardAttribute::VendorSpecific.kind(), DataKind::VendorSpecific);
    }
}
