//! Prototype hub registry and screen navigation.
//!
//! # Responsibility
//! - Describe the launcher entries and what selecting each one does.
//! - Track the visible screen as an explicit navigation stack.
//!
//! # Invariants
//! - Entry ids are unique within the registry.
//! - The navigation stack always keeps the hub screen at its root.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mini-apps realized in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniApp {
    /// To-do list with live sync (`service::task_board`).
    Tasks,
    /// Markdown note manager (`service::note_pad`).
    Notes,
}

/// What selecting a hub entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Opens an in-process mini-app screen.
    MiniApp(MiniApp),
    /// Hands a URL to the shell to open externally.
    External(&'static str),
    /// Entry is listed but not built yet; shows a placeholder screen.
    Planned,
}

/// One launcher card on the hub screen.
#[derive(Debug, Clone, Copy)]
pub struct HubEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Accent color hex used by the card chrome.
    pub accent: &'static str,
    pub launch: Launch,
}

/// All launcher entries in display order.
pub fn hub_entries() -> &'static [HubEntry] {
    ENTRIES
}

/// Finds one entry by id.
pub fn find_entry(id: &str) -> Option<&'static HubEntry> {
    ENTRIES.iter().find(|entry| entry.id == id)
}

const ENTRIES: &[HubEntry] = &[
    HubEntry {
        id: "todo",
        title: "My Tasks",
        description: "To-do manager with real-time sync",
        icon: "📝",
        accent: "#667eea",
        launch: Launch::MiniApp(MiniApp::Tasks),
    },
    HubEntry {
        id: "business-research",
        title: "Business Research",
        description: "Markdown research notes",
        icon: "📊",
        accent: "#06b6d4",
        launch: Launch::MiniApp(MiniApp::Notes),
    },
    HubEntry {
        id: "gryb-online",
        title: "GRYB Online",
        description: "Online art program",
        icon: "🎨",
        accent: "#10b981",
        launch: Launch::External("https://gryb-online.vercel.app"),
    },
    HubEntry {
        id: "proud100",
        title: "Proud100 Brand Guide",
        description: "Brand guideline deck",
        icon: "📖",
        accent: "#8b5cf6",
        launch: Launch::External("https://proud-bi.netlify.app"),
    },
    HubEntry {
        id: "draw-play",
        title: "Draw & Play",
        description: "Daily drawing and mini-game missions",
        icon: "🎨",
        accent: "#10b981",
        launch: Launch::External("https://proud-prototype2.netlify.app/"),
    },
    HubEntry {
        id: "grim-store",
        title: "Grim Store",
        description: "Marketplace for senior artwork",
        icon: "🛒",
        accent: "#ef4444",
        launch: Launch::External("https://proud-prototype1.netlify.app/"),
    },
    HubEntry {
        id: "3d-gallery",
        title: "3D Gallery",
        description: "3D gallery and exhibition space",
        icon: "🏛️",
        accent: "#f59e0b",
        launch: Launch::External("https://ph-poc-3dgallery.netlify.app/"),
    },
    HubEntry {
        id: "feed-view",
        title: "Feed View",
        description: "Social feed and content viewer",
        icon: "📱",
        accent: "#ef4444",
        launch: Launch::Planned,
    },
    HubEntry {
        id: "mini-games",
        title: "Mini Games",
        description: "Mini game collection",
        icon: "🎮",
        accent: "#06b6d4",
        launch: Launch::Planned,
    },
    HubEntry {
        id: "event-1",
        title: "Event #1",
        description: "Special events and promotions",
        icon: "🎉",
        accent: "#ec4899",
        launch: Launch::Planned,
    },
];

/// One visible screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Hub,
    MiniApp(MiniApp),
    /// Placeholder for a planned entry, keyed by its id.
    Placeholder(&'static str),
}

/// Result of opening a hub entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    /// A screen was pushed onto the stack.
    Pushed(Screen),
    /// The entry points outside the app; the stack is unchanged and the
    /// shell should open this URL.
    ExternalUrl(&'static str),
}

/// Hub navigation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    UnknownEntry(String),
}

impl Display for HubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEntry(id) => write!(f, "unknown hub entry: {id}"),
        }
    }
}

impl Error for HubError {}

/// Explicit screen stack, replacing ambient current-screen state.
///
/// The hub screen is the permanent root; `back` never pops past it.
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Hub],
        }
    }

    pub fn current(&self) -> Screen {
        // The root is pushed at construction and never popped.
        *self.stack.last().unwrap_or(&Screen::Hub)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Resolves an entry id and pushes its screen, if it has one.
    pub fn open(&mut self, id: &str) -> Result<Opened, HubError> {
        let entry = find_entry(id).ok_or_else(|| HubError::UnknownEntry(id.to_string()))?;

        let screen = match entry.launch {
            Launch::MiniApp(app) => Screen::MiniApp(app),
            Launch::Planned => Screen::Placeholder(entry.id),
            Launch::External(url) => return Ok(Opened::ExternalUrl(url)),
        };

        self.stack.push(screen);
        Ok(Opened::Pushed(screen))
    }

    /// Pops the top screen. Returns false when already at the hub root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
