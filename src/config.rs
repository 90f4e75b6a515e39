//! Process-wide lookup tables used by the cleaning pipeline and the dump reader.
//!
//! Everything here is fixed at startup. The tables are built once behind a
//! [`LazyLock`] and handed out as `&'static` references, so any number of
//! worker threads can read them without locking.

use std::sync::LazyLock;

/// Block-level elements removed together with their content.
const DISCARD_TAGS: &[&str] = &[
    "gallery", "timeline", "noinclude", "pre", "table", "tr", "td", "th", "caption", "form",
    "input", "select", "option", "textarea", "ul", "li", "ol", "dl", "dt", "dd", "menu", "dir",
    "ref", "references", "img", "imagemap", "source", "math", "code",
];

/// Formatting wrappers: markers are dropped, content is kept.
const IGNORED_TAGS: &[&str] = &[
    "b", "big", "blockquote", "center", "cite", "div", "em", "font", "h1", "h2", "h3", "h4",
    "hiero", "i", "kbd", "nowiki", "p", "plaintext", "s", "small", "span", "strike", "strong",
    "sub", "sup", "tt", "u", "var",
];

/// Tags that appear as a single `<tag ... />` occurrence.
const SELF_CLOSING_TAGS: &[&str] = &["br", "hr", "nobr", "ref", "references"];

/// Link namespaces pointing at non-prose assets (compared lowercase).
const ASSET_NAMESPACES: &[&str] = &[
    "file", "image", "media", "category", "文件", "檔案", "档案", "图像", "圖像", "媒体", "媒體",
    "分类", "分類",
];

/// Image placement and caption keywords, matched as whole words.
const IMAGE_KEYWORDS: &[&str] = &[
    "thumb", "thumbnail", "right", "left", "center", "frame", "frameless", "border", "upright",
    "缩略图", "縮圖", "缩图", "右", "左", "居中", "置中", "框架",
];

/// Section titles after which an article carries no more prose.
const TRAILING_SECTIONS: &[&str] = &[
    "参见", "參見", "注释", "註釋", "注解", "参考文献", "參考文獻", "参考资料", "參考資料",
    "参考书目", "參考書目", "外部链接", "外部連結", "延伸阅读", "延伸閱讀", "相关条目",
    "相關條目", "另见", "另見", "脚注", "腳註",
];

static GLOBAL: LazyLock<CleanConfig> = LazyLock::new(CleanConfig::builtin);

/// Immutable lookup tables shared by every cleaning call.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Namespace ids the dump reader accepts (0 is the article namespace).
    pub accepted_namespaces: Vec<i64>,
    /// Tags removed together with everything between open and close.
    pub discard_tags: Vec<&'static str>,
    /// Tags whose markers are removed while the content stays.
    pub ignored_tags: Vec<&'static str>,
    /// Tags removed as a single self-closing occurrence.
    pub self_closing_tags: Vec<&'static str>,
    /// Lowercase namespace prefixes of links that are dropped entirely.
    pub asset_namespaces: Vec<&'static str>,
    /// Whole-word image caption vocabulary.
    pub image_keywords: Vec<&'static str>,
    /// Section headings that end the useful part of an article.
    pub trailing_sections: Vec<&'static str>,
}

impl CleanConfig {
    /// Returns the process-wide configuration.
    pub fn global() -> &'static CleanConfig {
        &GLOBAL
    }

    fn builtin() -> Self {
        Self {
            accepted_namespaces: vec![0],
            discard_tags: DISCARD_TAGS.to_vec(),
            ignored_tags: IGNORED_TAGS.to_vec(),
            self_closing_tags: SELF_CLOSING_TAGS.to_vec(),
            asset_namespaces: ASSET_NAMESPACES.to_vec(),
            image_keywords: IMAGE_KEYWORDS.to_vec(),
            trailing_sections: TRAILING_SECTIONS.to_vec(),
        }
    }

    /// Returns true if pages in this namespace are articles worth cleaning.
    pub fn accepts_namespace(&self, ns: i64) -> bool {
        self.accepted_namespaces.contains(&ns)
    }

    /// Returns true if a link with this namespace prefix points at an asset.
    ///
    /// The comparison is case-insensitive.
    pub fn is_asset_namespace(&self, prefix: &str) -> bool {
        let prefix = prefix.to_lowercase();
        self.asset_namespaces.iter().any(|ns| *ns == prefix)
    }
}
