//! End-to-end tests: wikitext and dumps in, JSON Lines out.

use pretty_assertions::assert_eq;
use std::io::Write;
use wikiclean::cleanup::{strip_nested, unescape, MIN_DOC_CHARS, MIN_DOC_CJK_RATIO};
use wikiclean::{
    clean, open_dump, process_dump, DumpReader, ProcessOptions, Record, RecordWriter,
};

const SENTENCE: &str =
    "长江是亚洲第一长河，全长六千三百余公里，流经青海、西藏、四川等十一个省级行政区。";

fn article() -> String {
    format!(
        "{{{{Infobox river\n| name = 长江\n| length = {{{{convert|6300|km}}}}\n}}}}\n\
         '''长江'''，古称'''江'''，是[[中国]]第一大河。{s}<ref name=\"a\">《长江志》，2001年</ref>\n\
         {{| class=\"wikitable\"\n! 河段 !! 长度\n|-\n| 上游 || 四千五百公里\n|}}\n\
         == 流域 ==\n\
         [[File:Yangtze.jpg|thumb|right|长江三峡]]\n\
         {s}[[上海|上海市]]位于长江入海口，是中国最大的城市之一，{s}\n\
         * 金沙江\n\
         == 参考文献 ==\n\
         {{{{reflist}}}}\n\
         [[Category:中国河流]]\n",
        s = SENTENCE
    )
}

fn page(id: u64, title: &str, ns: u32, body: &str) -> String {
    let body = body
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "  <page>\n    <title>{title}</title>\n    <ns>{ns}</ns>\n    <id>{id}</id>\n    \
         <revision>\n      <id>{}</id>\n      <text xml:space=\"preserve\">{body}</text>\n    \
         </revision>\n  </page>\n",
        id + 1000
    )
}

fn sample_dump() -> String {
    let mut xml = String::from(
        "<mediawiki xmlns=\"http://www.mediawiki.org/xml/export-0.10/\" xml:lang=\"zh\">\n",
    );
    xml.push_str(&page(1, "长江", 0, &article()));
    xml.push_str(&page(2, "Category:河流", 14, &SENTENCE.repeat(5)));
    xml.push_str(&page(3, "扬子江", 0, "#REDIRECT [[长江]]"));
    xml.push_str(&page(4, "小条目", 0, "'''小条目'''是一个小条目。"));
    xml.push_str(&page(5, "黄河", 0, &SENTENCE.repeat(4)));
    xml.push_str("</mediawiki>\n");
    xml
}

fn records(output: &[u8]) -> Vec<Record> {
    std::str::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_nested_template_removed_entirely() {
    assert_eq!(strip_nested("{{a{{b}}c}}", "{{", "}}"), "");
}

#[test]
fn test_double_escaped_entity() {
    assert_eq!(unescape(&unescape("&amp;amp;")), "&");
}

#[test]
fn test_article_cleaned() {
    let text = clean(&article());
    assert!(!text.is_empty());

    for removed in [
        "Infobox", "convert", "长江志", "wikitable", "河段", "File", "三峡", "金沙江", "reflist",
        "Category", "'''", "[[", "==",
    ] {
        assert!(!text.contains(removed), "{removed:?} left in {text:?}");
    }
    assert!(text.starts_with("长江，古称江，是中国第一大河。 长江是亚洲第一长河"));
    assert!(text.contains("上海市位于长江入海口"));

    let length = text.chars().count();
    let cjk = text.chars().filter(|c| ('\u{4E00}'..='\u{9FFF}').contains(c)).count();
    assert!(length >= MIN_DOC_CHARS);
    assert!(cjk as f64 >= length as f64 * MIN_DOC_CJK_RATIO);
}

#[test]
fn test_clean_is_idempotent() {
    let once = clean(&article());
    assert_eq!(clean(&once), once);
}

#[test]
fn test_captions_and_lists_only_rejected() {
    let raw = "[[File:a.jpg|thumb|图片]]\n* 第一项内容说明\n# 第二项内容说明\n\
               长江三峡，瞿塘峡，巫峡，西陵峡\n: 缩进的说明文字\n短句。";
    assert_eq!(clean(raw), "");
}

#[test]
fn test_dump_to_jsonl() {
    let xml = sample_dump();
    let mut reader = DumpReader::new(xml.as_bytes());
    let mut writer = RecordWriter::new(Vec::new()).with_sample(Vec::new(), 1);

    let summary = process_dump(&mut reader, &mut writer, &ProcessOptions::default(), |_| {}).unwrap();

    assert_eq!(summary.dump.pages_seen, 5);
    assert_eq!(summary.dump.skipped_namespace, 1);
    assert_eq!(summary.dump.skipped_redirect, 1);
    assert_eq!(summary.corpus.accepted, 2);
    assert_eq!(summary.corpus.rejected, 1);
    assert_eq!(summary.sampled, 1);

    let (main, sample) = writer.into_inner();
    let main = records(&main);
    let ids: Vec<u64> = main.iter().map(|r| r.meta.id).collect();
    assert_eq!(ids, vec![1, 5]);
    assert_eq!(main[0].meta.title, "长江");
    assert_eq!(main[0].meta.length, main[0].text.chars().count());
    assert_eq!(main[0].text, clean(&article()));

    let ratio = main[1].meta.chinese_ratio;
    assert_eq!((ratio * 1000.0).round() / 1000.0, ratio);

    let sample = records(&sample.unwrap());
    assert_eq!(sample, main[..1].to_vec());
}

#[test]
fn test_dump_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = dir.path().join("zhwiki-pages-articles.xml");
    std::fs::File::create(&dump_path)
        .unwrap()
        .write_all(sample_dump().as_bytes())
        .unwrap();

    let out_path = dir.path().join("out.jsonl");
    let mut reader = open_dump(&dump_path).unwrap();
    let mut writer = RecordWriter::new(std::fs::File::create(&out_path).unwrap());
    let options = ProcessOptions::default().with_max_articles(1).sequential();
    let summary = process_dump(&mut reader, &mut writer, &options, |_| {}).unwrap();
    drop(writer);

    assert!(summary.limit_reached);
    let written = std::fs::read(&out_path).unwrap();
    let written = records(&written);
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].meta.id, 1);
}
