use serde::{Deserialize, Serialize};

use crate::models::{now_rfc3339, BlogPost, BlogPostType, ImagePost, MediaRef, MusicPost, TextPost};
use crate::tips::BLOG_TIPS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogAction {
    SetActiveTab(BlogPostType),
    SetCurrentTip(usize),
    IncrementTip,
    ToggleSidebar,
    TogglePrivate,
    SetDraftContent(String),
    AddTextPost,
    AddImagePost(MediaRef),
    AddMusicPost(MediaRef),
}

impl BlogAction {
    /// Whether the action changes the persisted buckets
    pub fn persists(&self) -> bool {
        matches!(
            self,
            BlogAction::AddTextPost | BlogAction::AddImagePost(_) | BlogAction::AddMusicPost(_)
        )
    }
}

/// Per-type post buckets, each newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogBuckets {
    #[serde(default)]
    pub text: Vec<TextPost>,
    #[serde(default)]
    pub image: Vec<ImagePost>,
    #[serde(default)]
    pub music: Vec<MusicPost>,
}

impl BlogBuckets {
    pub fn len(&self) -> usize {
        self.text.len() + self.image.len() + self.music.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogUi {
    pub active_tab: BlogPostType,
    pub current_tip: usize,
    pub sidebar_collapsed: bool,
    pub is_private: bool,
}

impl Default for BlogUi {
    fn default() -> Self {
        Self {
            active_tab: BlogPostType::Text,
            current_tip: 0,
            sidebar_collapsed: false,
            is_private: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogState {
    pub posts: BlogBuckets,
    pub ui: BlogUi,
    pub draft: String,
}

impl BlogState {
    pub fn with_posts(posts: BlogBuckets) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn reduce(&mut self, action: BlogAction) -> bool {
        match action {
            BlogAction::SetActiveTab(tab) => {
                let changed = self.ui.active_tab != tab;
                self.ui.active_tab = tab;
                changed
            }
            BlogAction::SetCurrentTip(index) => {
                let index = index % BLOG_TIPS.len();
                let changed = self.ui.current_tip != index;
                self.ui.current_tip = index;
                changed
            }
            BlogAction::IncrementTip => {
                self.ui.current_tip = (self.ui.current_tip + 1) % BLOG_TIPS.len();
                true
            }
            BlogAction::ToggleSidebar => {
                self.ui.sidebar_collapsed = !self.ui.sidebar_collapsed;
                true
            }
            BlogAction::TogglePrivate => {
                self.ui.is_private = !self.ui.is_private;
                true
            }
            BlogAction::SetDraftContent(content) => {
                let changed = self.draft != content;
                self.draft = content;
                changed
            }
            BlogAction::AddTextPost => {
                if self.draft.trim().is_empty() {
                    return false;
                }
                let content = std::mem::take(&mut self.draft);
                self.posts.text.insert(
                    0,
                    TextPost {
                        content,
                        is_private: self.ui.is_private,
                        timestamp: now_rfc3339(),
                    },
                );
                true
            }
            BlogAction::AddImagePost(image) => {
                self.posts.image.insert(
                    0,
                    ImagePost {
                        image,
                        is_private: self.ui.is_private,
                        timestamp: now_rfc3339(),
                    },
                );
                true
            }
            BlogAction::AddMusicPost(music) => {
                self.posts.music.insert(
                    0,
                    MusicPost {
                        music,
                        is_private: self.ui.is_private,
                        timestamp: now_rfc3339(),
                    },
                );
                true
            }
        }
    }

    /// All buckets merged, newest first. Ties keep text, image, music order.
    pub fn all_posts(&self) -> Vec<BlogPost> {
        let mut all: Vec<BlogPost> = self
            .posts
            .text
            .iter()
            .cloned()
            .map(BlogPost::Text)
            .chain(self.posts.image.iter().cloned().map(BlogPost::Image))
            .chain(self.posts.music.iter().cloned().map(BlogPost::Music))
            .collect();
        all.sort_by(|a, b| post_time(b).cmp(&post_time(a)));
        all
    }
}

/// Parsed timestamp for ordering; unparsable values sort last
fn post_time(post: &BlogPost) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc3339(post.timestamp()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(name: &str) -> MediaRef {
        MediaRef {
            id: crate::storage::media_id(name.as_bytes()),
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            size: name.len() as u64,
        }
    }

    #[test]
    fn text_post_uses_draft_and_privacy() {
        let mut state = BlogState::default();
        state.reduce(BlogAction::TogglePrivate);
        state.reduce(BlogAction::SetDraftContent("# Hello".into()));
        assert!(state.reduce(BlogAction::AddTextPost));
        assert_eq!(state.posts.text[0].content, "# Hello");
        assert!(state.posts.text[0].is_private);
        assert!(state.draft.is_empty());
    }

    #[test]
    fn blank_text_post_is_ignored() {
        let mut state = BlogState::default();
        state.reduce(BlogAction::SetDraftContent("  \n ".into()));
        assert!(!state.reduce(BlogAction::AddTextPost));
        assert!(state.posts.is_empty());
    }

    #[test]
    fn media_posts_prepend_to_their_bucket() {
        let mut state = BlogState::default();
        state.reduce(BlogAction::AddImagePost(media("a.png")));
        state.reduce(BlogAction::AddImagePost(media("b.png")));
        state.reduce(BlogAction::AddMusicPost(media("c.mp3")));
        assert_eq!(state.posts.image[0].image.file_name, "b.png");
        assert_eq!(state.posts.music.len(), 1);
        assert_eq!(state.posts.len(), 3);
    }

    #[test]
    fn all_posts_sorted_newest_first_and_tagged() {
        let mut state = BlogState::default();
        state.posts.text.push(TextPost {
            content: "old".into(),
            is_private: false,
            timestamp: "2024-01-01T08:00:00.000Z".into(),
        });
        state.posts.image.push(ImagePost {
            image: media("mid.png"),
            is_private: false,
            timestamp: "2024-01-02T08:00:00.000Z".into(),
        });
        state.posts.music.push(MusicPost {
            music: media("new.mp3"),
            is_private: true,
            timestamp: "2024-01-03T08:00:00.000Z".into(),
        });

        let kinds: Vec<_> = state.all_posts().iter().map(BlogPost::kind).collect();
        assert_eq!(kinds, vec![BlogPostType::Music, BlogPostType::Image, BlogPostType::Text]);

        let json = serde_json::to_value(&state.all_posts()[0]).unwrap();
        assert_eq!(json["type"], "music");
        assert_eq!(json["isPrivate"], true);
    }

    #[test]
    fn tips_wrap_around() {
        let mut state = BlogState::default();
        for _ in 0..BLOG_TIPS.len() {
            state.reduce(BlogAction::IncrementTip);
        }
        assert_eq!(state.ui.current_tip, 0);
        state.reduce(BlogAction::SetCurrentTip(BLOG_TIPS.len() + 2));
        assert_eq!(state.ui.current_tip, 2);
    }

    #[test]
    fn buckets_json_round_trip_keeps_media_refs() {
        let mut state = BlogState::default();
        state.reduce(BlogAction::AddMusicPost(media("song.ogg")));
        let json = serde_json::to_string(&state.posts).unwrap();
        let back: BlogBuckets = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state.posts);
    }
}
