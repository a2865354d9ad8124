use chrono::Local;
use std::collections::HashSet;

use crate::models::{display_time, Comment, JournalMood, JournalPost};

pub const COMMENT_USERNAME: &str = "you";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalAction {
    SetAnimateIn(bool),
    ToggleLike(u64),
    HighlightPost(u64),
    ResetHighlight,
    ToggleComments(u64),
    SetDraftCaption(String),
    SetDraftMood(JournalMood),
    ResetDraft,
    ToggleExpanded,
    SetExpanded(bool),
    AddPost,
    MarkPostAsOld(u64),
    AddComment { id: u64, text: String },
    SetActiveTab(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDraft {
    pub caption: String,
    pub mood: JournalMood,
}

/// Health journal feed. Lives only for the session; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalState {
    pub posts: Vec<JournalPost>,
    pub liked: HashSet<u64>,
    pub show_comments: HashSet<u64>,
    pub draft: JournalDraft,
    pub expanded: bool,
    pub highlighted: Option<u64>,
    pub animate_in: bool,
    pub active_tab: String,
}

impl Default for JournalState {
    fn default() -> Self {
        Self {
            posts: vec![welcome_post()],
            liked: HashSet::new(),
            show_comments: HashSet::new(),
            draft: JournalDraft::default(),
            expanded: false,
            highlighted: None,
            animate_in: false,
            active_tab: "journal".to_string(),
        }
    }
}

fn welcome_post() -> JournalPost {
    JournalPost {
        id: 1,
        caption: "Morning meditation helps clear my mind and set the tone for the day. ☀️ #Mindfulness #HealthJournal"
            .to_string(),
        mood: JournalMood::Happy,
        likes: 120,
        comments: vec![
            Comment { username: "fit_life".to_string(), text: "Absolutely agree!".to_string() },
            Comment { username: "yoga_lover".to_string(), text: "Meditation changed my life.".to_string() },
        ],
        timestamp: "Today at 8:45 AM".to_string(),
        is_new: false,
    }
}

impl JournalState {
    /// A feed with no posts
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            ..Self::default()
        }
    }

    pub fn reduce(&mut self, action: JournalAction) -> bool {
        match action {
            JournalAction::SetAnimateIn(on) => replace(&mut self.animate_in, on),
            JournalAction::ToggleLike(id) => {
                if !self.liked.remove(&id) {
                    self.liked.insert(id);
                }
                true
            }
            JournalAction::HighlightPost(id) => replace(&mut self.highlighted, Some(id)),
            JournalAction::ResetHighlight => replace(&mut self.highlighted, None),
            JournalAction::ToggleComments(id) => {
                if !self.show_comments.remove(&id) {
                    self.show_comments.insert(id);
                }
                true
            }
            JournalAction::SetDraftCaption(caption) => replace(&mut self.draft.caption, caption),
            JournalAction::SetDraftMood(mood) => replace(&mut self.draft.mood, mood),
            JournalAction::ResetDraft => replace(&mut self.draft, JournalDraft::default()),
            JournalAction::ToggleExpanded => {
                self.expanded = !self.expanded;
                true
            }
            JournalAction::SetExpanded(on) => replace(&mut self.expanded, on),
            JournalAction::AddPost => self.add_post(),
            JournalAction::MarkPostAsOld(id) => match self.post_mut(id) {
                Some(post) => replace(&mut post.is_new, false),
                None => false,
            },
            JournalAction::AddComment { id, text } => {
                if text.trim().is_empty() {
                    return false;
                }
                match self.post_mut(id) {
                    Some(post) => {
                        post.comments.push(Comment {
                            username: COMMENT_USERNAME.to_string(),
                            text,
                        });
                        true
                    }
                    None => false,
                }
            }
            JournalAction::SetActiveTab(tab) => replace(&mut self.active_tab, tab),
        }
    }

    fn add_post(&mut self) -> bool {
        if self.draft.caption.trim().is_empty() {
            return false;
        }
        let now = Local::now();
        let mut id = now.timestamp_millis().max(0) as u64;
        while self.posts.iter().any(|p| p.id == id) {
            id += 1;
        }
        let draft = std::mem::take(&mut self.draft);
        self.posts.insert(
            0,
            JournalPost {
                id,
                caption: draft.caption,
                mood: draft.mood,
                likes: 0,
                comments: Vec::new(),
                timestamp: display_time(now),
                is_new: true,
            },
        );
        self.expanded = false;
        true
    }

    fn post_mut(&mut self, id: u64) -> Option<&mut JournalPost> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    pub fn post(&self, id: u64) -> Option<&JournalPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn is_liked(&self, id: u64) -> bool {
        self.liked.contains(&id)
    }

    pub fn comments_visible(&self, id: u64) -> bool {
        self.show_comments.contains(&id)
    }

    /// Stored likes plus one when the current user liked the post
    pub fn effective_likes(&self, id: u64) -> Option<u32> {
        self.post(id)
            .map(|p| p.likes + u32::from(self.is_liked(id)))
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
