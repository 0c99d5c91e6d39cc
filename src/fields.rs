//! Column names, fixed column orders and rename maps for every output table.
//!
//! Each table gets its own module holding the table name and its column order; builders reindex
//! to these lists so absent columns come out as nulls and nothing else leaks through.

pub const POST_ID: &str = "post_id";
pub const TEXT: &str = "text";
pub const TWEET_TYPE: &str = "tweet_type";
pub const REFERENCE_LEVEL: &str = "reference_level";
pub const REFERENCING_POST_ID: &str = "referencing_post_id";
pub const REFERENCED_POST_ID: &str = "referenced_post_id";
pub const AUTHOR_ID: &str = "author_id";
pub const AUTHOR_USERNAME: &str = "author_username";
pub const IN_REPLY_TO_USER_ID: &str = "in_reply_to_user_id";
pub const REFERENCED_POST_TEXT: &str = "referenced_post_text";
pub const REFERENCED_AUTHOR_ID: &str = "referenced_post_author_id";
pub const REFERENCED_AUTHOR_USERNAME: &str = "referenced_post_author_username";
pub const REFERENCED_AUTHOR_NAME: &str = "referenced_post_author_name";

/// Raw nested list of referenced posts on an API record.
pub const REFERENCES: &str = "referenced_tweets";
/// Reference kind on each element of [`REFERENCES`].
pub const REFERENCE_TYPE: &str = "type";

/// Values of `tweet_type` / `interaction_type`.
pub mod kind {
    pub const ORIGINAL: &str = "original";
    pub const RETWEET: &str = "retweet";
    pub const QUOTE: &str = "quote";
    pub const REPLY: &str = "reply";
    pub const MENTION: &str = "mention";

    /// API reference type to post type.
    pub fn from_reference(api: &str) -> Option<&'static str> {
        match api {
            "retweeted" => Some(RETWEET),
            "replied_to" => Some(REPLY),
            "quoted" => Some(QUOTE),
            _ => None,
        }
    }
}

/// Entity list columns on the post table.
pub mod entity_fields {
    pub const HASHTAGS: &str = "entities_hashtags";
    pub const MENTIONS: &str = "entities_mentions";
    pub const URLS: &str = "entities_urls";
    pub const ANNOTATIONS: &str = "entities_annotations";
    pub const CONTEXT_ANNOTATIONS: &str = "context_annotations";
    pub const MEDIA: &str = "attachments_media";
    pub const MEDIA_ALT: &str = "media";
    pub const POLL_ID: &str = "attachments_poll_id";
    pub const POLL_OPTIONS: &str = "attachments_poll_options";
    pub const EDIT_HISTORY: &str = "edit_history_tweet_ids";
}

/// Columns carried up from level i onto the level i-1 rows that reference them.
pub const UPLIFT_COLUMNS: &[&str] = &[
    "post_id",
    "referencing_post_id",
    "type",
    "text",
    "entities_hashtags",
    "entities_mentions",
    "entities_urls",
    "entities_annotations",
    "author_id",
    "author_name",
    "author_username",
    "author_description",
    "author_url",
    "author_public_metrics_followers_count",
    "author_public_metrics_following_count",
    "author_public_metrics_tweet_count",
    "author_public_metrics_listed_count",
    "author_created_at",
    "author_location",
    "author_pinned_tweet_id",
    "author_profile_image_url",
    "author_protected",
    "author_verified",
];

/// Applied in order: the referenced post's id moves aside before its parent id takes `post_id`.
pub const UPLIFT_RENAMES: &[(&str, &str)] = &[
    ("post_id", "referenced_post_id"),
    ("referencing_post_id", "post_id"),
    ("type", "tweet_type"),
    ("text", "referenced_post_text"),
    ("entities_hashtags", "referenced_post_hashtags"),
    ("entities_mentions", "referenced_post_mentions"),
    ("entities_urls", "referenced_post_urls"),
    ("entities_annotations", "referenced_post_annotations"),
    ("author_id", "referenced_post_author_id"),
    ("author_name", "referenced_post_author_name"),
    ("author_username", "referenced_post_author_username"),
    ("author_description", "referenced_post_author_description"),
    ("author_url", "referenced_post_author_url"),
    ("author_public_metrics_followers_count", "referenced_post_author_public_metrics_followers_count"),
    ("author_public_metrics_following_count", "referenced_post_author_public_metrics_following_count"),
    ("author_public_metrics_tweet_count", "referenced_post_author_public_metrics_tweet_count"),
    ("author_public_metrics_listed_count", "referenced_post_author_public_metrics_listed_count"),
    ("author_created_at", "referenced_post_author_created_at"),
    ("author_location", "referenced_post_author_location"),
    ("author_pinned_tweet_id", "referenced_post_author_pinned_tweet_id"),
    ("author_profile_image_url", "referenced_post_author_profile_image_url"),
    ("author_protected", "referenced_post_author_protected"),
    ("author_verified", "referenced_post_author_verified"),
];

/// Entity columns a retweet inherits from the post it repeats.
pub const RETWEET_ENTITY_COPIES: &[(&str, &str)] = &[
    ("entities_hashtags", "referenced_post_hashtags"),
    ("entities_mentions", "referenced_post_mentions"),
    ("entities_urls", "referenced_post_urls"),
    ("entities_annotations", "referenced_post_annotations"),
];

pub mod posts {
    pub const TABLE: &str = "posts";
    pub const COLUMNS: &[&str] = &[
        "post_id",
        "text",
        "tweet_type",
        "created_at",
        "public_metrics_like_count",
        "public_metrics_quote_count",
        "public_metrics_reply_count",
        "public_metrics_retweet_count",
        "is_retweet",
        "is_reply",
        "is_quote",
        "has_mention",
        "has_media",
        "has_hashtags",
        "has_urls",
        "has_annotations",
        "has_context_annotations",
        "lang",
        "possibly_sensitive",
        "conversation_id",
        "reply_settings",
        "source",
        "is_referenced",
        "reference_level",
        "referencing_post_id",
        "referenced_post_id",
        "author_id",
        "author_username",
        "author_name",
        "author_description",
        "author_url",
        "author_public_metrics_followers_count",
        "author_public_metrics_following_count",
        "author_public_metrics_tweet_count",
        "author_public_metrics_listed_count",
        "author_created_at",
        "author_location",
        "author_pinned_tweet_id",
        "author_profile_image_url",
        "author_protected",
        "author_verified",
        "referenced_post_text",
        "referenced_post_author_id",
        "referenced_post_author_username",
        "referenced_post_author_name",
        "referenced_post_author_description",
        "referenced_post_author_url",
        "referenced_post_author_public_metrics_followers_count",
        "referenced_post_author_public_metrics_following_count",
        "referenced_post_author_public_metrics_listed_count",
        "referenced_post_author_public_metrics_tweet_count",
        "referenced_post_author_created_at",
        "referenced_post_author_location",
        "referenced_post_author_pinned_tweet_id",
        "referenced_post_author_profile_image_url",
        "referenced_post_author_protected",
        "referenced_post_author_verified",
        "geo_id",
        "geo_place_id",
        "geo_name",
        "geo_country",
        "geo_country_code",
        "geo_full_name",
        "geo_geo_type",
        "geo_place_type",
        "geo_geo_bbox",
        "attachments_poll_id",
        "attachments_poll_voting_status",
        "attachments_poll_duration_minutes",
        "attachments_poll_end_datetime",
        "twarc_retrieved_at",
        "twarc_url",
        "twarc_version",
    ];

    /// Count columns that default to 0 when the API omits them.
    pub const COUNT_COLUMNS: &[&str] = &[
        "public_metrics_like_count",
        "public_metrics_quote_count",
        "public_metrics_reply_count",
        "public_metrics_retweet_count",
        "author_public_metrics_followers_count",
        "author_public_metrics_following_count",
        "author_public_metrics_tweet_count",
        "author_public_metrics_listed_count",
        "referenced_post_author_public_metrics_followers_count",
        "referenced_post_author_public_metrics_following_count",
        "referenced_post_author_public_metrics_listed_count",
        "referenced_post_author_public_metrics_tweet_count",
    ];

    /// `has_*` flag and the entity list columns it reports on, first present column wins.
    pub const HAS_FLAGS: &[(&str, &[&str])] = &[
        ("has_media", &["attachments_media", "media"]),
        ("has_mention", &["entities_mentions"]),
        ("has_hashtags", &["entities_hashtags"]),
        ("has_urls", &["entities_urls"]),
        ("has_annotations", &["entities_annotations"]),
        ("has_context_annotations", &["context_annotations"]),
    ];

    pub const BBOX: &str = "geo_geo_bbox";
}

pub mod hashtags {
    pub const TABLE: &str = "hashtags";
    pub const TAG: &str = "hashtags_tag";
    pub const COLUMNS: &[&str] = &["post_id", "hashtags_start", "hashtags_end", "hashtags_tag"];
}

pub mod urls {
    pub const TABLE: &str = "urls";
    pub const URL: &str = "urls_url";
    pub const EXPANDED_URL: &str = "urls_expanded_url";
    pub const UNWOUND_URL: &str = "urls_unwound_url";
    pub const STATUS: &str = "urls_status";
    pub const IMAGES: &str = "urls_images";
    pub const COLUMNS: &[&str] = &[
        "post_id",
        "urls_start",
        "urls_end",
        "urls_url",
        "urls_expanded_url",
        "urls_display_url",
        "urls_status",
        "urls_unwound_url",
        "urls_title",
        "urls_description",
    ];
}

pub mod mentions {
    pub const TABLE: &str = "mentions";
    pub const PREFIX: &str = "mentions_author";
    pub const AUTHOR_ID: &str = "mentions_author_id";
    pub const USERNAME: &str = "mentions_author_username";
    pub const NAME: &str = "mentions_author_name";
    pub const COLUMNS: &[&str] = &[
        "post_id",
        "mentions_author_start",
        "mentions_author_end",
        "mentions_author_username",
        "mentions_author_id",
        "mentions_author_protected",
        "mentions_author_location",
        "mentions_author_verified",
        "mentions_author_profile_image_url",
        "mentions_author_description",
        "mentions_author_created_at",
        "mentions_author_pinned_tweet_id",
        "mentions_author_url",
        "mentions_author_name",
        "mentions_author_public_metrics_followers_count",
        "mentions_author_public_metrics_following_count",
        "mentions_author_public_metrics_tweet_count",
        "mentions_author_public_metrics_listed_count",
    ];
}

pub mod media {
    pub const TABLE: &str = "media";
    pub const KEY: &str = "media_key";
    pub const TYPE: &str = "media_type";
    pub const URL: &str = "media_url";
    pub const PREVIEW_URL: &str = "media_preview_image_url";
    pub const VIEW_COUNT: &str = "media_public_metrics_view_count";
    pub const RENAMES: &[(&str, &str)] = &[("media_media_key", "media_key")];
    pub const DROP: &[&str] = &["media_variants"];
    pub const COLUMNS: &[&str] = &[
        "post_id",
        "media_height",
        "media_key",
        "media_width",
        "media_type",
        "media_url",
        "media_duration_ms",
        "media_preview_image_url",
        "media_public_metrics_view_count",
        "media_alt_text",
    ];
}

pub mod poll_options {
    pub const TABLE: &str = "poll_options";
    pub const KEY: &str = "poll_id";
    pub const LABEL: &str = "poll_label";
    pub const COLUMNS: &[&str] = &["poll_id", "poll_position", "poll_label", "poll_votes"];
}

pub mod context_annotations {
    pub const TABLE: &str = "context_annotations";
    pub const PREFIX: &str = "context_annotation";
    pub const ENTITY_ID: &str = "context_annotation_entity_id";
    pub const COLUMNS: &[&str] = &[
        "post_id",
        "context_annotation_domain_id",
        "context_annotation_domain_name",
        "context_annotation_domain_description",
        "context_annotation_entity_id",
        "context_annotation_entity_name",
        "context_annotation_entity_description",
    ];
}

pub mod annotations {
    pub const TABLE: &str = "annotations";
    pub const PREFIX: &str = "annotation";
    pub const NORMALIZED_TEXT: &str = "annotation_normalized_text";
    pub const COLUMNS: &[&str] = &[
        "post_id",
        "annotation_start",
        "annotation_end",
        "annotation_probability",
        "annotation_type",
        "annotation_normalized_text",
    ];
}

pub mod author_description {
    pub const TABLE: &str = "author_description";
    pub const COLUMNS: &[&str] = &[
        "author_id",
        "author_description_hashtags_start",
        "author_description_hashtags_end",
        "author_description_hashtags_tag",
        "author_description_mentions_start",
        "author_description_mentions_end",
        "author_description_mentions_username",
        "author_description_urls_start",
        "author_description_urls_end",
        "author_description_urls_url",
        "author_description_urls_expanded_url",
        "author_description_urls_display_url",
    ];
}

pub mod author_urls {
    pub const TABLE: &str = "author_urls";
    pub const URL: &str = "author_url_url";
    pub const COLUMNS: &[&str] = &[
        "author_id",
        "author_url_start",
        "author_url_end",
        "author_url_url",
        "author_url_expanded_url",
        "author_url_display_url",
    ];
}

pub mod interactions {
    pub const TABLE: &str = "interactions";
    pub const TYPE: &str = "interaction_type";
    pub const TO_USER_ID: &str = "to_user_id";
    pub const TO_USER_USERNAME: &str = "to_user_username";
    pub const COLUMNS: &[&str] = &["post_id", "interaction_type", "to_user_id", "to_user_username"];
}

pub mod edit_history {
    pub const TABLE: &str = "edit_history";
    pub const EDITED_POST_ID: &str = "edited_post_id";
    pub const COLUMNS: &[&str] = &["post_id", "edited_post_id"];
}

/// Denormalized layout with `tweets`, `hashtags` and `mentions` tables.
pub mod legacy_a {
    pub const POSTS_TABLE: &str = "tweets";
    pub const HASHTAGS_TABLE: &str = "hashtags";
    pub const MENTIONS_TABLE: &str = "mentions";

    pub const POST_RENAMES: &[(&str, &str)] = &[
        ("post_id", "id"),
        ("author_username", "from_user_name"),
        ("public_metrics_retweet_count", "retweet_count"),
        ("public_metrics_like_count", "like_count"),
        ("referenced_post_author_username", "to_user_name"),
        ("author_location", "location"),
        ("author_id", "from_user_id"),
        ("author_name", "from_user_realname"),
        ("author_verified", "from_user_verified"),
        ("author_description", "from_user_description"),
        ("author_url", "from_user_url"),
        ("author_profile_image_url", "from_user_profile_image_url"),
        ("author_public_metrics_tweet_count", "from_user_tweetcount"),
        ("author_public_metrics_followers_count", "from_user_followercount"),
        ("author_public_metrics_following_count", "from_user_friendcount"),
        ("author_public_metrics_listed_count", "from_user_listed"),
        ("author_created_at", "from_user_created_at"),
    ];

    /// Columns with no counterpart in the API payload, emitted as empty strings.
    pub const BLANK: &[&str] = &[
        "filter_level",
        "withheld_copyright",
        "withheld_scope",
        "truncated",
        "lat",
        "lng",
        "from_user_utcoffset",
        "from_user_timezone",
        "from_user_lang",
        "from_user_favourites_count",
        "from_user_withheld_scope",
    ];

    pub const POST_COLUMNS: &[&str] = &[
        "id",
        "time",
        "created_at",
        "from_user_name",
        "text",
        "filter_level",
        "possibly_sensitive",
        "withheld_copyright",
        "withheld_scope",
        "truncated",
        "retweet_count",
        "like_count",
        "lang",
        "to_user_name",
        "in_reply_to_status_id",
        "quoted_status_id",
        "source",
        "location",
        "lat",
        "lng",
        "from_user_id",
        "from_user_realname",
        "from_user_verified",
        "from_user_description",
        "from_user_url",
        "from_user_profile_image_url",
        "from_user_utcoffset",
        "from_user_timezone",
        "from_user_lang",
        "from_user_tweetcount",
        "from_user_followercount",
        "from_user_friendcount",
        "from_user_favourites_count",
        "from_user_listed",
        "from_user_withheld_scope",
        "from_user_created_at",
    ];

    pub const HASHTAG_COLUMNS: &[&str] = &["tweet_id", "hashtag"];

    pub const MENTION_COLUMNS: &[&str] =
        &["tweet_id", "user_from_id", "user_from_name", "user_to_id", "user_to_name", "mention_type"];
}

/// Single flat `tweets_flat` table.
pub mod legacy_b {
    pub const TABLE: &str = "tweets_flat";

    pub const POST_RENAMES: &[(&str, &str)] = &[
        ("post_id", "id"),
        ("public_metrics_like_count", "favorite_count"),
        ("public_metrics_quote_count", "quote_count"),
        ("public_metrics_reply_count", "reply_count"),
        ("public_metrics_retweet_count", "retweet_count"),
        ("geo_country", "place_country"),
        ("geo_country_code", "place_country_code"),
        ("geo_full_name", "place_full_name"),
        ("geo_place_id", "place_id"),
        ("geo_name", "place_name"),
        ("geo_place_type", "place_place_type"),
        ("author_created_at", "user_created_at"),
        ("author_description", "user_description"),
        ("author_public_metrics_followers_count", "user_followers_count"),
        ("author_public_metrics_following_count", "user_friends_count"),
        ("author_public_metrics_listed_count", "user_listed_count"),
        ("author_public_metrics_tweet_count", "user_statuses_count"),
        ("author_id", "user_id"),
        ("author_location", "user_location"),
        ("author_name", "user_name"),
        ("author_profile_image_url", "user_profile_image_url"),
        ("author_username", "user_screen_name"),
        ("author_url", "user_url"),
        ("author_verified", "user_verified"),
    ];

    pub const BLANK: &[&str] = &[
        "coordinates_coordinates_0",
        "coordinates_coordinates_1",
        "coordinates_type",
        "entities_polls",
        "entities_symbols",
        "favorited",
        "filter_level",
        "geo_coordinates_0",
        "geo_coordinates_1",
        "geo_type",
        "matching_rules",
        "place_url",
        "truncated",
        "user_contributors_enabled",
        "user_default_profile",
        "user_default_profile_image",
        "user_favourites_count",
        "user_geo_enabled",
        "user_is_translator",
        "user_lang",
        "user_profile_background_color",
        "user_profile_background_image_url",
        "user_profile_background_title",
        "user_profile_banner_url",
        "user_profile_fill_color",
        "user_profile_link_color",
        "user_profile_sidebar_border_color",
        "user_profile_text_color",
        "user_profile_use_background_image",
        "user_time_zone",
        "user_utc_offset",
    ];

    pub const COLUMNS: &[&str] = &[
        "coordinates_coordinates_0",
        "coordinates_coordinates_1",
        "coordinates_type",
        "created_at",
        "entities_polls",
        "entities_symbols",
        "favorite_count",
        "favorited",
        "filter_level",
        "full_text",
        "geo_coordinates_0",
        "geo_coordinates_1",
        "geo_type",
        "id",
        "in_reply_to_screen_name",
        "in_reply_to_status_id",
        "in_reply_to_user_id",
        "is_quote_status",
        "lang",
        "matching_rules",
        "place_country",
        "place_country_code",
        "place_full_name",
        "place_id",
        "place_name",
        "place_place_type",
        "place_url",
        "possibly_sensitive",
        "quote_count",
        "quoted_status_id",
        "quoted_status_text",
        "quoted_status_user_id",
        "reply_count",
        "retweet_count",
        "retweeted",
        "retweeted_status_id",
        "retweeted_status_user_id",
        "source",
        "text",
        "truncated",
        "user_contributors_enabled",
        "user_created_at",
        "user_default_profile",
        "user_default_profile_image",
        "user_description",
        "user_favourites_count",
        "user_followers_count",
        "user_friends_count",
        "user_geo_enabled",
        "user_id",
        "user_is_translator",
        "user_lang",
        "user_listed_count",
        "user_location",
        "user_name",
        "user_profile_background_color",
        "user_profile_background_image_url",
        "user_profile_background_title",
        "user_profile_banner_url",
        "user_profile_fill_color",
        "user_profile_image_url",
        "user_profile_image_url_https",
        "user_profile_link_color",
        "user_profile_sidebar_border_color",
        "user_profile_text_color",
        "user_profile_use_background_image",
        "user_screen_name",
        "user_statuses_count",
        "user_time_zone",
        "user_url",
        "user_utc_offset",
        "user_verified",
        "entities_hashtags_text",
        "entities_user_mentions_name",
        "entities_user_mention_id",
        "entities_user_mention_screen_name",
        "urls_url",
        "urls_expanded_url",
        "urls_unshortened_url",
        "urls_domain_path",
        "urls_status",
    ];
}
