use shiplabel::symbols::{encode_barcode, encode_qr, BarcodeOptions, QrImage, QrOptions, QrSize};

// Code 128 bar/space widths for symbol values 0..=105
const PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232",
];
const STOP: &str = "2331112";

fn runs(modules: &[u8]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < modules.len() {
        let v = modules[i];
        let start = i;
        while i < modules.len() && modules[i] == v {
            i += 1;
        }
        out.push(i - start);
    }
    out
}

#[derive(Clone, Copy)]
enum Set {
    A,
    B,
    C,
}

/// Minimal Code 128 reader for the module patterns the encoder emits
fn decode_code128(modules: &[u8]) -> String {
    assert_eq!(modules.first(), Some(&1), "symbol must start with a bar");
    let widths: Vec<String> = runs(modules).iter().map(|w| w.to_string()).collect();
    assert!(widths.len() >= 6 + 7 && (widths.len() - 7) % 6 == 0, "bad run count");

    let body = widths.len() - 7;
    assert_eq!(widths[body..].concat(), STOP);

    let values: Vec<usize> = widths[..body]
        .chunks(6)
        .map(|chunk| {
            let pattern = chunk.concat();
            PATTERNS
                .iter()
                .position(|p| *p == pattern)
                .unwrap_or_else(|| panic!("unknown pattern {}", pattern))
        })
        .collect();

    let (checksum, data) = values.split_last().unwrap();
    let expected = data
        .iter()
        .enumerate()
        .map(|(i, v)| if i == 0 { *v } else { i * v })
        .sum::<usize>()
        % 103;
    assert_eq!(*checksum, expected, "checksum mismatch");

    let mut set = match data[0] {
        103 => Set::A,
        104 => Set::B,
        105 => Set::C,
        v => panic!("bad start value {}", v),
    };
    let mut out = String::new();
    for &v in &data[1..] {
        match (set, v) {
            (_, 99) => set = Set::C,
            (Set::A, 100) | (Set::C, 100) => set = Set::B,
            (Set::B, 101) | (Set::C, 101) => set = Set::A,
            (Set::C, v) => out.push_str(&format!("{:02}", v)),
            (Set::B, v) => out.push((v as u8 + 32) as char),
            (Set::A, v) if v < 64 => out.push((v as u8 + 32) as char),
            (Set::A, v) => out.push((v as u8 - 64) as char),
        }
    }
    out
}

fn decode_qr_modules(img: &QrImage) -> String {
    const SCALE: usize = 4;
    const QUIET: usize = 4;
    let side = img.modules_per_side();
    let px = (side + 2 * QUIET) * SCALE;
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(px, px, |x, y| {
        let mx = (x / SCALE) as isize - QUIET as isize;
        let my = (y / SCALE) as isize - QUIET as isize;
        if mx >= 0 && my >= 0 && img.is_dark(mx as usize, my as usize) {
            0
        } else {
            255
        }
    });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
    let (_, content) = grids[0].decode().expect("decode QR");
    content
}

#[test]
fn barcode_roundtrips_tracking_number() {
    let img = encode_barcode("SPXID064356436531", &BarcodeOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(decode_code128(img.modules()), "SPXID064356436531");
}

#[test]
fn barcode_roundtrips_mixed_sets() {
    for value in [
        "12345",
        "AB1234CD",
        "X 9-Z",
        "0000",
        "A12345678B",
        "SPX\tID01",
        "\tab",
        "AB\u{7f}",
        "\u{0}\u{1f}_`~",
    ] {
        let img = encode_barcode(value, &BarcodeOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(decode_code128(img.modules()), value, "value {:?}", value);
    }
}

#[test]
fn barcode_is_deterministic() {
    let opts = BarcodeOptions::default();
    let a = encode_barcode("SPXID064356436531", &opts).unwrap().unwrap();
    let b = encode_barcode("SPXID064356436531", &opts).unwrap().unwrap();
    assert_eq!(a.modules(), b.modules());
    assert_eq!(a.options().bar_height, 32.0);
}

#[test]
fn qr_roundtrips_order_id() {
    let img = encode_qr("2601179M0WA1WA", &QrOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(decode_qr_modules(&img), "2601179M0WA1WA");
}

#[test]
fn qr_bitmap_follows_modules() {
    let img = encode_qr(
        "2601179M0WA1WA",
        &QrOptions {
            size: QrSize::Standard,
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    let side = img.modules_per_side();
    let size = img.size_px() as usize;
    let scale = size as f32 / side as f32;
    for my in 0..side {
        for mx in 0..side {
            let px = ((mx as f32 + 0.5) * scale) as usize;
            let py = ((my as f32 + 0.5) * scale) as usize;
            let dark = img.pixels()[py * size + px] == 0;
            assert_eq!(dark, img.is_dark(mx, my), "module ({}, {})", mx, my);
        }
    }
}
