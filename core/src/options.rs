//! Typed query options for the read endpoints.
//!
//! Each options struct maps onto a fixed set of query keys, so two fields
//! can never contribute the same key. Unset scalars and empty lists are
//! omitted from the query string entirely.

use strum::{AsRefStr, EnumString};

/// Query keys understood by the API.
pub mod keys {
    pub const EXPANSIONS: &str = "expansions";
    pub const LIST_FIELDS: &str = "list.fields";
    pub const USER_FIELDS: &str = "user.fields";
    pub const TWEET_FIELDS: &str = "tweet.fields";
    pub const MAX_RESULTS: &str = "max_results";
    pub const PAGINATION_TOKEN: &str = "pagination_token";
}

/// Contributes `(key, value)` pairs to a request's query string.
pub trait QueryOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

impl QueryOptions for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ListField {
    CreatedAt,
    FollowerCount,
    MemberCount,
    Private,
    Description,
    OwnerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum UserField {
    CreatedAt,
    Description,
    Entities,
    Id,
    Location,
    Name,
    PinnedTweetId,
    ProfileImageUrl,
    Protected,
    PublicMetrics,
    Url,
    Username,
    Verified,
    Withheld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TweetField {
    Attachments,
    AuthorId,
    ContextAnnotations,
    ConversationId,
    CreatedAt,
    Entities,
    Geo,
    Id,
    InReplyToUserId,
    Lang,
    PublicMetrics,
    PossiblySensitive,
    ReferencedTweets,
    ReplySettings,
    Source,
    Text,
    Withheld,
}

/// Expansions available on endpoints returning users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum UserExpansion {
    #[strum(to_string = "pinned_tweet_id")]
    PinnedTweetId,
}

/// Expansions available on endpoints returning lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum ListExpansion {
    #[strum(to_string = "owner_id")]
    OwnerId,
}

/// Expansions available on endpoints returning tweets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum TweetExpansion {
    #[strum(to_string = "author_id")]
    AuthorId,
    #[strum(to_string = "referenced_tweets.id")]
    ReferencedTweetsId,
    #[strum(to_string = "referenced_tweets.id.author_id")]
    ReferencedTweetsIdAuthorId,
    #[strum(to_string = "in_reply_to_user_id")]
    InReplyToUserId,
    #[strum(to_string = "entities.mentions.username")]
    EntitiesMentionsUsername,
}

/// Options for the single-list lookup and pinned lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub expansions: Vec<ListExpansion>,
    pub list_fields: Vec<ListField>,
    pub user_fields: Vec<UserField>,
}

impl QueryOptions for ListOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_joined(&mut pairs, keys::EXPANSIONS, &self.expansions);
        push_joined(&mut pairs, keys::LIST_FIELDS, &self.list_fields);
        push_joined(&mut pairs, keys::USER_FIELDS, &self.user_fields);
        pairs
    }
}

/// Options for paged endpoints returning lists: owned lists, list
/// memberships and followed lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPageOptions {
    pub expansions: Vec<ListExpansion>,
    pub list_fields: Vec<ListField>,
    pub user_fields: Vec<UserField>,
    pub max_results: Option<u32>,
    pub pagination_token: Option<String>,
}

impl QueryOptions for ListPageOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_joined(&mut pairs, keys::EXPANSIONS, &self.expansions);
        push_joined(&mut pairs, keys::LIST_FIELDS, &self.list_fields);
        push_joined(&mut pairs, keys::USER_FIELDS, &self.user_fields);
        push_page(&mut pairs, self.max_results, self.pagination_token.as_deref());
        pairs
    }
}

/// Options for paged endpoints returning users: list members and list
/// followers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPageOptions {
    pub expansions: Vec<UserExpansion>,
    pub tweet_fields: Vec<TweetField>,
    pub user_fields: Vec<UserField>,
    pub max_results: Option<u32>,
    pub pagination_token: Option<String>,
}

impl QueryOptions for UserPageOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_joined(&mut pairs, keys::EXPANSIONS, &self.expansions);
        push_joined(&mut pairs, keys::TWEET_FIELDS, &self.tweet_fields);
        push_joined(&mut pairs, keys::USER_FIELDS, &self.user_fields);
        push_page(&mut pairs, self.max_results, self.pagination_token.as_deref());
        pairs
    }
}

/// Options for a list's tweet timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetPageOptions {
    pub expansions: Vec<TweetExpansion>,
    pub tweet_fields: Vec<TweetField>,
    pub user_fields: Vec<UserField>,
    pub max_results: Option<u32>,
    pub pagination_token: Option<String>,
}

impl QueryOptions for TweetPageOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_joined(&mut pairs, keys::EXPANSIONS, &self.expansions);
        push_joined(&mut pairs, keys::TWEET_FIELDS, &self.tweet_fields);
        push_joined(&mut pairs, keys::USER_FIELDS, &self.user_fields);
        push_page(&mut pairs, self.max_results, self.pagination_token.as_deref());
        pairs
    }
}

/// Comma-join `values` in supplied order, dropping repeats.
fn push_joined<T: AsRef<str>>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, values: &[T]) {
    let mut seen: Vec<&str> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_ref();
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    if !seen.is_empty() {
        pairs.push((key, seen.join(",")));
    }
}

fn push_page(pairs: &mut Vec<(&'static str, String)>, max_results: Option<u32>, token: Option<&str>) {
    if let Some(max) = max_results {
        pairs.push((keys::MAX_RESULTS, max.to_string()));
    }
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        pairs.push((keys::PAGINATION_TOKEN, token.to_string()));
    }
}
