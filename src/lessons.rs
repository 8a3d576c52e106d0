//! Built-in lesson catalog (Toán 4, Chân trời sáng tạo).
//! Used when the config file does not provide its own list.

pub fn default_lessons() -> Vec<String> {
  [
    "Bài 1: Ôn tập các số đến 100 000",
    "Bài 2: Ôn tập phép cộng, phép trừ",
    "Bài 3: Ôn tập phép nhân, phép chia",
    "Bài 4: Số chẵn, số lẻ",
    "Bài 5: Em làm được những gì?",
    "Bài 6: Biểu thức có chứa chữ",
    "Bài 7: Dãy số liệu",
    "Bài 8: Biểu đồ cột",
    "Bài 9: Số lần lặp lại của một sự kiện",
    "Bài 10: Góc nhọn, góc tù, góc bẹt",
    "Bài 11: Đo góc – Đơn vị đo góc",
    "Bài 12: Hai đường thẳng vuông góc",
    "Bài 13: Hai đường thẳng song song",
    "Bài 14: Số có nhiều chữ số",
    "Bài 15: Hàng và lớp",
    "Bài 16: So sánh các số có nhiều chữ số",
    "Bài 17: Làm tròn số đến hàng trăm nghìn",
    "Bài 18: Yến, tạ, tấn",
    "Bài 19: Giây, thế kỉ",
    "Bài 20: Tìm số trung bình cộng",
    "Bài 21: Phân số",
    "Bài 22: Rút gọn phân số",
    "Bài 23: Quy đồng mẫu số các phân số",
    "Bài 24: Cộng, trừ phân số",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

/// True when `lesson` is one of the catalog entries.
pub fn is_known(catalog: &[String], lesson: &str) -> bool {
  catalog.iter().any(|l| l == lesson)
}
