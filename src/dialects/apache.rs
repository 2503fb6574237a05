//! Apache httpd `LogFormat` dialect.
//!
//! Extends [`ncsa`](super::ncsa) with single-letter directives (`%a`, `%D`,
//! `%v`, ...) and the braced collection families `%{Name}i`, `%{Name}o`,
//! `%{Name}e` and `%{Name}C`. Field ids continue after
//! [`ncsa::NUM_FIELDS`], so every NCSA id is also a valid Apache id.

use super::{Dialect, Overlay, ncsa};
use crate::{CollectionSet, FieldId};

const START: usize = ncsa::NUM_FIELDS;

pub const REMOTE_IP: FieldId = FieldId(START);
pub const LOCAL_IP: FieldId = FieldId(START + 1);
pub const DURATION_USEC: FieldId = FieldId(START + 2);
pub const FILENAME: FieldId = FieldId(START + 3);
pub const KEEPALIVE_NUM: FieldId = FieldId(START + 4);
pub const PORT: FieldId = FieldId(START + 5);
pub const WORKER_PID: FieldId = FieldId(START + 6);
pub const HANDLER: FieldId = FieldId(START + 7);
pub const DURATION_SEC: FieldId = FieldId(START + 8);
pub const DEFINED_SERVER_NAME: FieldId = FieldId(START + 9);
pub const SERVER_NAME: FieldId = FieldId(START + 10);
pub const CONNECTION_STATUS: FieldId = FieldId(START + 11);
pub const RECEIVED_BYTES: FieldId = FieldId(START + 12);
pub const SENT_BYTES: FieldId = FieldId(START + 13);
pub const USER_AGENT: FieldId = FieldId(START + 14);
pub const REFERER: FieldId = FieldId(START + 15);
pub const CONTENT_TYPE: FieldId = FieldId(START + 16);
pub const CONTENT_LENGTH: FieldId = FieldId(START + 17);

pub const NUM_FIELDS: usize = START + 18;

pub const COMMON_FORMAT: &str = ncsa::COMMON_FORMAT;
pub const VHOST_COMMON_FORMAT: &str = "%v %h %l %u %t \"%r\" %>s %b";
pub const COMBINED_FORMAT: &str = "%h %l %u %t \"%r\" %>s %b \"%{Referer}i\" \"%{User-agent}i\"";

pub(crate) const PRESETS: &[(&str, &str)] = &[
    ("common", COMMON_FORMAT),
    ("vcommon", VHOST_COMMON_FORMAT),
    ("vhost-common", VHOST_COMMON_FORMAT),
    ("extended", COMBINED_FORMAT),
    ("combined", COMBINED_FORMAT),
];

pub(crate) const FIELD_NAMES: [&str; NUM_FIELDS - START] = [
    "remoteIp",
    "localIp",
    "durationUsec",
    "filename",
    "keepaliveNum",
    "port",
    "workerPid",
    "handler",
    "durationSec",
    "definedServerName",
    "serverName",
    "connectionStatus",
    "receivedBytes",
    "sentBytes",
    "userAgent",
    "referer",
    "contentType",
    "contentLength",
];

pub(crate) fn build(base: &Dialect) -> Dialect {
    let directives = vec![
        directive!("a" => r"(?P<remoteIp>\d+\.\d+\.\d+\.\d+|[0-9a-fA-F:]+)", binds: [("remoteIp", REMOTE_IP)]),
        directive!("A" => r"(?P<localIp>\d+\.\d+\.\d+\.\d+|[0-9a-fA-F:]+)", binds: [("localIp", LOCAL_IP)]),
        directive!("B" => r"(?P<bytesZero>\d+)", binds: [("bytesZero", ncsa::NUMBYTES)]),
        directive!("D" => r"(?P<durationUsec>\d+)", binds: [("durationUsec", DURATION_USEC)]),
        directive!("f" => r"(?P<filename>[^\s]+)", binds: [("filename", FILENAME)]),
        directive!("H" => r"(?P<protocol>[\w/.]+)", binds: [("protocol", ncsa::PROTOCOL)]),
        directive!("k" => r"(?P<keepaliveNum>\d+)", binds: [("keepaliveNum", KEEPALIVE_NUM)]),
        directive!("m" => r"(?P<method>[A-Z]+)", binds: [("method", ncsa::METHOD)]),
        directive!("p" => r"(?P<port>\d+)", binds: [("port", PORT)]),
        directive!("P" => r"(?P<workerPid>\d+)", binds: [("workerPid", WORKER_PID)]),
        directive!("q" => r"(?P<queryString>\?[^\s]+|)", binds: [("queryString", ncsa::QUERY_STRING)]),
        directive!("R" => r"(?P<handler>[^\s]+)", binds: [("handler", HANDLER)]),
        directive!("T" => r"(?P<durationSec>\d+)", binds: [("durationSec", DURATION_SEC)]),
        directive!("U" => r"(?P<urlPath>[^\s?]+)", binds: [("urlPath", ncsa::URL_PATH)]),
        directive!("v" => r"(?P<definedServerName>[^\s]+)", binds: [("definedServerName", DEFINED_SERVER_NAME)]),
        directive!("V" => r"(?P<serverName>[^\s]+)", binds: [("serverName", SERVER_NAME)]),
        directive!("X" => r"(?P<connectionStatus>[-X+])", binds: [("connectionStatus", CONNECTION_STATUS)]),
        directive!("I" => r"(?P<receivedBytes>\d+)", binds: [("receivedBytes", RECEIVED_BYTES)]),
        directive!("O" => r"(?P<sentBytes>\d+)", binds: [("sentBytes", SENT_BYTES)]),
        directive!(
            "{User-agent}i" => r#"(?P<_User_agent_i>[^"]*)"#,
            binds: [("_User_agent_i", USER_AGENT)],
            exceptional: true
        ),
        directive!(
            "{Referer}i" => r"(?P<_Referer_i>[^\s]+|-)",
            binds: [("_Referer_i", REFERER)],
            exceptional: true
        ),
        directive!(
            "{Content-type}o" => r#"(?P<_Content_type_o>[^"]+|-)"#,
            binds: [("_Content_type_o", CONTENT_TYPE)],
            exceptional: true
        ),
        directive!(
            "{Content-length}o" => r"(?P<_Content_length_o>\d+|-)",
            binds: [("_Content_length_o", CONTENT_LENGTH)],
            exceptional: true
        ),
    ];

    base.overlay(Overlay {
        name: "apache",
        grammar: regex!(r"^(?:>?[a-zA-Z]|\{[-A-Za-z0-9_]+\}[a-zA-Z])"),
        directives,
        field_names: &FIELD_NAMES,
        collections: CollectionSet::all(),
        presets: PRESETS,
    })
}
