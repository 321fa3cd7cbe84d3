// Test fixtures: a small dataset written to disk in the seed format

use std::path::PathBuf;

use furqan::core::config::Config;
use serde_json::json;
use tempfile::TempDir;

/// (part, chapter, verse, text, clean_text)
#[allow(dead_code)] // Used in integration tests
pub const FIXTURE_VERSES: &[(u16, u16, u16, &str, &str)] = &[
    (1, 1, 1, "بِسۡمِ ٱللَّهِ ٱلرَّحۡمَٰنِ ٱلرَّحِيمِ", "بسم الله الرحمن الرحيم"),
    (1, 1, 2, "ٱلۡحَمۡدُ لِلَّهِ رَبِّ ٱلۡعَٰلَمِينَ", "الحمد لله رب العالمين"),
    (1, 1, 3, "ٱلرَّحۡمَٰنِ ٱلرَّحِيمِ", "الرحمن الرحيم"),
    (1, 1, 4, "مَٰلِكِ يَوۡمِ ٱلدِّينِ", "مالك يوم الدين"),
    (1, 1, 5, "إِيَّاكَ نَعۡبُدُ وَإِيَّاكَ نَسۡتَعِينُ", "إياك نعبد وإياك نستعين"),
    (1, 1, 6, "ٱهۡدِنَا ٱلصِّرَٰطَ ٱلۡمُسۡتَقِيمَ", "اهدنا الصراط المستقيم"),
    (1, 1, 7, "صِرَٰطَ ٱلَّذِينَ أَنۡعَمۡتَ عَلَيۡهِمۡ غَيۡرِ ٱلۡمَغۡضُوبِ عَلَيۡهِمۡ وَلَا ٱلضَّآلِّينَ", "صراط الذين أنعمت عليهم غير المغضوب عليهم ولا الضالين"),
    (1, 2, 21, "يَٰٓأَيُّهَا ٱلنَّاسُ ٱعۡبُدُواْ رَبَّكُمُ ٱلَّذِي خَلَقَكُمۡ وَٱلَّذِينَ مِن قَبۡلِكُمۡ لَعَلَّكُمۡ تَتَّقُونَ", "يا أيها الناس اعبدوا ربكم الذي خلقكم والذين من قبلكم لعلكم تتقون"),
    (1, 2, 104, "يَٰٓأَيُّهَا ٱلَّذِينَ ءَامَنُواْ لَا تَقُولُواْ رَٰعِنَا وَقُولُواْ ٱنظُرۡنَا وَٱسۡمَعُواْۗ وَلِلۡكَٰفِرِينَ عَذَابٌ أَلِيمٞ", "يا أيها الذين آمنوا لا تقولوا راعنا وقولوا انظرنا واسمعوا وللكافرين عذاب أليم"),
    (2, 2, 161, "إِنَّ ٱلَّذِينَ كَفَرُواْ وَمَاتُواْ وَهُمۡ كُفَّارٌ أُوْلَٰٓئِكَ عَلَيۡهِمۡ لَعۡنَةُ ٱللَّهِ وَٱلۡمَلَٰٓئِكَةِ وَٱلنَّاسِ أَجۡمَعِينَ", "إن الذين كفروا وماتوا وهم كفار أولئك عليهم لعنة الله والملائكة والناس أجمعين"),
    (2, 2, 183, "يَٰٓأَيُّهَا ٱلَّذِينَ ءَامَنُواْ كُتِبَ عَلَيۡكُمُ ٱلصِّيَامُ كَمَا كُتِبَ عَلَى ٱلَّذِينَ مِن قَبۡلِكُمۡ لَعَلَّكُمۡ تَتَّقُونَ", "يا أيها الذين آمنوا كتب عليكم الصيام كما كتب على الذين من قبلكم لعلكم تتقون"),
    (2, 2, 187, "أُحِلَّ لَكُمۡ لَيۡلَةَ ٱلصِّيَامِ ٱلرَّفَثُ إِلَىٰ نِسَآئِكُمۡۚ هُنَّ لِبَاسٞ لَّكُمۡ وَأَنتُمۡ لِبَاسٞ لَّهُنَّۗ", "أحل لكم ليلة الصيام الرفث إلى نسائكم هن لباس لكم وأنتم لباس لهن"),
    (2, 2, 198, "لَيۡسَ عَلَيۡكُمۡ جُنَاحٌ أَن تَبۡتَغُواْ فَضۡلٗا مِّن رَّبِّكُمۡۚ فَإِذَآ أَفَضۡتُم مِّنۡ عَرَفَٰتٖ فَٱذۡكُرُواْ ٱللَّهَ عِندَ ٱلۡمَشۡعَرِ ٱلۡحَرَامِۖ وَٱذۡكُرُوهُ كَمَا هَدَىٰكُمۡ وَإِن كُنتُم مِّن قَبۡلِهِۦ لَمِنَ ٱلضَّآلِّينَ", "ليس عليكم جناح أن تبتغوا فضلا من ربكم فإذا أفضتم من عرفات فاذكروا الله عند المشعر الحرام واذكروه كما هداكم وإن كنتم من قبله لمن الضالين"),
];

/// Seed dataset files in a temporary directory
#[allow(dead_code)] // Used in integration tests
pub struct TestCorpus {
    pub dir: TempDir,
    pub verses_file: PathBuf,
    pub chapter_names_file: PathBuf,
    pub part_names_file: PathBuf,
}

impl TestCorpus {
    /// Write the fixture verses in the seed file formats
    #[allow(dead_code)] // Used in integration tests
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let records: Vec<_> = FIXTURE_VERSES
            .iter()
            .map(|(part, chapter, verse, text, clean)| {
                let (name_en, name_ar) = match chapter {
                    1 => ("Al-Fātiḥah", "الفَاتِحة"),
                    _ => ("Al-Baqarah", "البَقَرَة"),
                };
                json!({
                    "jozz": part,
                    "sora": chapter,
                    "sora_name_en": name_en,
                    "sora_name_ar": name_ar,
                    "aya_no": verse,
                    "aya_text": text,
                    "aya_text_emlaey": clean,
                    "page": if *chapter == 1 { 1 } else { 2 },
                    "line_start": 2,
                    "line_end": 3,
                })
            })
            .collect();

        let verses_file = dir.path().join("verses.json");
        let chapter_names_file = dir.path().join("chapter_names.json");
        let part_names_file = dir.path().join("part_names.json");

        std::fs::write(&verses_file, serde_json::to_vec(&records).unwrap()).unwrap();
        std::fs::write(
            &chapter_names_file,
            serde_json::to_vec(&json!({
                "الفَاتِحة": "الفاتحة",
                "البَقَرَة": "البقرة",
            }))
            .unwrap(),
        )
        .unwrap();
        std::fs::write(
            &part_names_file,
            serde_json::to_vec(&json!({
                "1": {"ar": "الأول", "en": "First"},
                "2": {"ar": "الثاني", "en": "Second"},
            }))
            .unwrap(),
        )
        .unwrap();

        Self {
            dir,
            verses_file,
            chapter_names_file,
            part_names_file,
        }
    }

    /// Configuration that seeds from this dataset into a private data dir
    #[allow(dead_code)] // Used in integration tests
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.corpus.verses_file = Some(self.verses_file.clone());
        config.corpus.chapter_names_file = Some(self.chapter_names_file.clone());
        config.corpus.part_names_file = Some(self.part_names_file.clone());
        config.corpus.require_complete = false;
        config.storage.data_dir = self.dir.path().join("data");
        config
    }
}
