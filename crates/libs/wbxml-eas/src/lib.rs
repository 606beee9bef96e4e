//! # wbxml-eas
//!
//! Exchange ActiveSync code pages as static data for `wbxml-codec`.
//!
//! Tag names are qualified with their page name, `"ComposeMail:SendMail"`,
//! matching the XML namespace prefixes used in protocol traces.
//!
//! ```rust
//! use wbxml_codec::{Encoder, TagRegistry};
//!
//! let table = wbxml_eas::registry()?;
//! let mut enc = Encoder::new(&table);
//! enc.open("ComposeMail:SendMail")?.empty_tag("ComposeMail:SaveInSentItems")?.close()?;
//! assert_eq!(enc.finish()?, vec![0x03, 0x01, 0x6A, 0x00, 0x00, 0x15, 0x45, 0x08, 0x01]);
//! # Ok::<(), wbxml_codec::CodecError>(())
//! ```

use wbxml_codec::{Result, TagTable};

/// One static code page.
#[derive(Debug, Clone, Copy)]
pub struct CodePage {
    pub page: u8,
    pub name: &'static str,
    pub tags: &'static [(&'static str, u8)],
}

pub const AIRSYNC: u8 = 0;
pub const EMAIL: u8 = 2;
pub const FOLDER_HIERARCHY: u8 = 7;
pub const PING: u8 = 13;
pub const AIRSYNC_BASE: u8 = 17;
pub const COMPOSE_MAIL: u8 = 21;
pub const EMAIL2: u8 = 22;

pub const PAGES: &[CodePage] = &[
    CodePage {
        page: AIRSYNC,
        name: "AirSync",
        tags: &[
            ("Sync", 0x05),
            ("Responses", 0x06),
            ("Add", 0x07),
            ("Change", 0x08),
            ("Delete", 0x09),
            ("Fetch", 0x0A),
            ("SyncKey", 0x0B),
            ("ClientId", 0x0C),
            ("ServerId", 0x0D),
            ("Status", 0x0E),
            ("Collection", 0x0F),
            ("Class", 0x10),
            ("CollectionId", 0x12),
            ("GetChanges", 0x13),
            ("MoreAvailable", 0x14),
            ("WindowSize", 0x15),
            ("Commands", 0x16),
            ("Options", 0x17),
            ("FilterType", 0x18),
            ("Conflict", 0x1B),
            ("Collections", 0x1C),
            ("ApplicationData", 0x1D),
            ("DeletesAsMoves", 0x1E),
            ("Supported", 0x20),
            ("SoftDelete", 0x21),
            ("MIMESupport", 0x22),
            ("MIMETruncation", 0x23),
            ("Wait", 0x24),
            ("Limit", 0x25),
            ("Partial", 0x26),
            ("ConversationMode", 0x27),
            ("MaxItems", 0x28),
            ("HeartbeatInterval", 0x29),
        ],
    },
    CodePage {
        page: EMAIL,
        name: "Email",
        tags: &[
            ("DateReceived", 0x0F),
            ("DisplayTo", 0x11),
            ("Importance", 0x12),
            ("MessageClass", 0x13),
            ("Subject", 0x14),
            ("Read", 0x15),
            ("To", 0x16),
            ("Cc", 0x17),
            ("From", 0x18),
            ("ReplyTo", 0x19),
            ("AllDayEvent", 0x1A),
            ("Categories", 0x1B),
            ("Category", 0x1C),
        ],
    },
    CodePage {
        page: FOLDER_HIERARCHY,
        name: "FolderHierarchy",
        tags: &[
            ("Folders", 0x05),
            ("Folder", 0x06),
            ("DisplayName", 0x07),
            ("ServerId", 0x08),
            ("ParentId", 0x09),
            ("Type", 0x0A),
            ("Status", 0x0C),
            ("ContentClass", 0x0D),
            ("Changes", 0x0E),
            ("Add", 0x0F),
            ("Delete", 0x10),
            ("Update", 0x11),
            ("SyncKey", 0x12),
            ("FolderCreate", 0x13),
            ("FolderDelete", 0x14),
            ("FolderUpdate", 0x15),
            ("FolderSync", 0x16),
            ("Count", 0x17),
        ],
    },
    CodePage {
        page: PING,
        name: "Ping",
        tags: &[
            ("Ping", 0x05),
            ("AutdState", 0x06),
            ("Status", 0x07),
            ("HeartbeatInterval", 0x08),
            ("Folders", 0x09),
            ("Folder", 0x0A),
            ("Id", 0x0B),
            ("Class", 0x0C),
            ("MaxFolders", 0x0D),
        ],
    },
    CodePage {
        page: AIRSYNC_BASE,
        name: "AirSyncBase",
        tags: &[
            ("BodyPreference", 0x05),
            ("Type", 0x06),
            ("TruncationSize", 0x07),
            ("AllOrNone", 0x08),
            ("Body", 0x0A),
            ("Data", 0x0B),
            ("EstimatedDataSize", 0x0C),
            ("Truncated", 0x0D),
            ("Attachments", 0x0E),
            ("Attachment", 0x0F),
            ("DisplayName", 0x10),
            ("FileReference", 0x11),
            ("Method", 0x12),
            ("ContentId", 0x13),
            ("ContentLocation", 0x14),
            ("IsInline", 0x15),
            ("NativeBodyType", 0x16),
            ("ContentType", 0x17),
            ("Preview", 0x18),
        ],
    },
    CodePage {
        page: COMPOSE_MAIL,
        name: "ComposeMail",
        tags: &[
            ("SendMail", 0x05),
            ("SmartForward", 0x06),
            ("SmartReply", 0x07),
            ("SaveInSentItems", 0x08),
            ("ReplaceMime", 0x09),
            ("Source", 0x0B),
            ("FolderId", 0x0C),
            ("ItemId", 0x0D),
            ("LongId", 0x0E),
            ("InstanceId", 0x0F),
            ("Mime", 0x10),
            ("ClientId", 0x11),
            ("Status", 0x12),
            ("AccountId", 0x13),
        ],
    },
    CodePage {
        page: EMAIL2,
        name: "Email2",
        tags: &[
            ("UmCallerID", 0x05),
            ("UmUserNotes", 0x06),
            ("UmAttDuration", 0x07),
            ("UmAttOrder", 0x08),
            ("ConversationId", 0x09),
            ("ConversationIndex", 0x0A),
            ("LastVerbExecuted", 0x0B),
            ("LastVerbExecutionTime", 0x0C),
            ("ReceivedAsBcc", 0x0D),
            ("Sender", 0x0E),
            ("CalendarType", 0x0F),
            ("IsLeapMonth", 0x10),
            ("AccountId", 0x11),
            ("FirstDayOfWeek", 0x12),
            ("MeetingMessageType", 0x13),
        ],
    },
];

/// Builds a registry holding every page in [`PAGES`].
pub fn registry() -> Result<TagTable> {
    let mut table = TagTable::new();
    for page in PAGES {
        table.add_page(page.page, page.name, page.tags)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wbxml_codec::{TagCode, TagRegistry};

    #[test]
    fn all_pages_build() {
        let table = registry().expect("static pages are consistent");
        let expected: usize = PAGES.iter().map(|page| page.tags.len()).sum();
        assert_eq!(table.len(), expected);
        for page in PAGES {
            assert_eq!(table.page_name(page.page), Some(page.name));
        }
    }

    #[test]
    fn same_local_name_resolves_per_page() {
        let table = registry().expect("registry");
        let status = |name: &str| table.lookup(&name.into()).expect("known");
        assert_eq!(status("AirSync:Status"), TagCode::new(AIRSYNC, 0x0E));
        assert_eq!(status("FolderHierarchy:Status"), TagCode::new(FOLDER_HIERARCHY, 0x0C));
        assert_eq!(status("ComposeMail:Status"), TagCode::new(COMPOSE_MAIL, 0x12));
    }

    #[test]
    fn pages_are_sorted_and_unique() {
        let pages: Vec<u8> = PAGES.iter().map(|page| page.page).collect();
        let mut sorted = pages.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(pages, sorted);
    }
}
