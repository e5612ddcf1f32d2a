//! 相機檔名比對模組
//!
//! 依照相機的三種命名規則解析檔名，取得檔案角色、標頭代碼、編號與章節

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// 低解析度預覽檔固定使用的標頭代碼
pub const LOWRES_HEADER: &str = "gl";
/// 低解析度預覽檔副檔名
pub const LOWRES_EXTENSION: &str = "lrv";
/// 主要影片副檔名
pub const MAIN_EXTENSION: &str = "mp4";

/// 檔案角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// 高解析度主要影片 (mp4)
    Main,
    /// 低解析度預覽檔 (lrv)
    LowRes,
}

/// 檔名規則中的片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Chapter,
    Number,
    Extension,
    Literal(&'static str),
}

impl Segment {
    fn pattern(self) -> String {
        match self {
            Self::Header => r"(?P<hdr>G[HXL])".to_string(),
            Self::Chapter => r"(?P<chp>[0-9]{2})".to_string(),
            Self::Number => r"(?P<num>[0-9]{4})".to_string(),
            Self::Extension => r"(?P<ext>lrv|mp4)".to_string(),
            Self::Literal(text) => regex::escape(text),
        }
    }
}

/// 單一檔名規則：依序排列的片段
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub name: &'static str,
    pub segments: &'static [Segment],
}

impl Grammar {
    /// 組成不分大小寫、完整比對檔名的正規表示式
    #[must_use]
    pub fn pattern(&self) -> String {
        let body: String = self.segments.iter().map(|s| s.pattern()).collect();
        format!("(?i)^{body}$")
    }
}

/// 依優先順序排列的檔名規則，第一個符合者勝出
pub const GRAMMARS: [Grammar; 3] = [
    // GH010001.MP4
    Grammar {
        name: "header-chapter-number",
        segments: &[
            Segment::Header,
            Segment::Chapter,
            Segment::Number,
            Segment::Literal("."),
            Segment::Extension,
        ],
    },
    // GH_0001_01.MP4
    Grammar {
        name: "header_number_chapter",
        segments: &[
            Segment::Header,
            Segment::Literal("_"),
            Segment::Number,
            Segment::Literal("_"),
            Segment::Chapter,
            Segment::Literal("."),
            Segment::Extension,
        ],
    },
    // 0001-01_GH.MP4
    Grammar {
        name: "number-chapter_header",
        segments: &[
            Segment::Number,
            Segment::Literal("-"),
            Segment::Chapter,
            Segment::Literal("_"),
            Segment::Header,
            Segment::Literal("."),
            Segment::Extension,
        ],
    },
];

static GRAMMAR_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    GRAMMARS
        .iter()
        .map(|grammar| Regex::new(&grammar.pattern()).expect("Invalid regex"))
        .collect()
});

/// Sibling index 的鍵值：(副檔名, 標頭, 編號, 章節)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraFileKey {
    pub extension: String,
    pub header: String,
    pub number: String,
    pub chapter: String,
}

/// 解析後的相機檔名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFile {
    pub kind: FileKind,
    /// 兩碼標頭（小寫）
    pub header: String,
    /// 四位數編號
    pub number: String,
    /// 兩位數章節
    pub chapter: String,
    /// 副檔名（小寫，不含前導點）
    pub extension: String,
}

impl CameraFile {
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.kind == FileKind::Main
    }

    /// 此檔案本身在 sibling index 中的鍵值
    #[must_use]
    pub fn key(&self) -> CameraFileKey {
        CameraFileKey {
            extension: self.extension.clone(),
            header: self.header.clone(),
            number: self.number.clone(),
            chapter: self.chapter.clone(),
        }
    }

    /// 對應的低解析度預覽檔鍵值（同編號、同章節）
    #[must_use]
    pub fn lowres_key(&self) -> CameraFileKey {
        CameraFileKey {
            extension: LOWRES_EXTENSION.to_string(),
            header: LOWRES_HEADER.to_string(),
            number: self.number.clone(),
            chapter: self.chapter.clone(),
        }
    }
}

/// 比對檔名，無法辨識時回傳 `None`
#[must_use]
pub fn match_camera_file(filename: &str) -> Option<CameraFile> {
    GRAMMAR_REGEXES.iter().find_map(|regex| {
        let caps = regex.captures(filename)?;
        let field = |name: &str| caps[name].to_lowercase();

        let extension = field("ext");
        let kind = if extension == MAIN_EXTENSION {
            FileKind::Main
        } else {
            FileKind::LowRes
        };

        Some(CameraFile {
            kind,
            header: field("hdr"),
            number: field("num"),
            chapter: field("chp"),
            extension,
        })
    })
}

/// 以路徑的檔名部分比對；非 UTF-8 檔名視為無法辨識
#[must_use]
pub fn match_camera_path(path: &Path) -> Option<CameraFile> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(match_camera_file)
}
