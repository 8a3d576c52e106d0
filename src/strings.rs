//! User-facing text. The app speaks Vietnamese only.

pub const APP_HEADING: &str = "Chào mừng đến với Gia sư Toán 4! 👋";
pub const APP_SUBHEADING: &str = "Hãy chọn một bài học để bắt đầu ôn tập nhé.";
pub const LOADING: &str = "Gia sư AI đang soạn bài... 🧠";

pub const GENERATION_FAILED: &str =
  "Rất tiếc, Gia sư AI không thể tạo bài tập lúc này. Con hãy thử lại sau nhé!";
pub const ANSWER_REQUIRED: &str = "Con hãy chọn một đáp án nhé!";
pub const UNKNOWN_LESSON: &str = "Bài học này không có trong danh sách.";

pub const QUESTION_LABEL: &str = "Câu";
pub const PROGRESS_LABEL: &str = "Câu hỏi";
pub const NEXT: &str = "Câu tiếp theo";
pub const SUBMIT: &str = "Nộp bài";
pub const FILL_PLACEHOLDER: &str = "Điền câu trả lời của con...";
pub const OPEN_PLACEHOLDER: &str = "Trình bày bài giải của con...";
pub const IMAGE_ALT: &str = "Minh hoạ cho câu";
pub const UNSUPPORTED_QUESTION: &str = "Dạng câu hỏi này chưa được hỗ trợ.";

pub const RESULTS_HEADING: &str = "Kết quả bài làm";
pub const REVIEW_HEADING: &str = "Xem lại bài làm:";
pub const YOUR_ANSWER: &str = "Câu trả lời của con:";
pub const CORRECT_ANSWER: &str = "Đáp án đúng:";
pub const NOT_ANSWERED: &str = "Chưa trả lời";
pub const FEEDBACK_HEADING: &str = "💡 Gợi ý sửa bài:";
pub const SOLUTION_HEADING: &str = "📘 Hướng dẫn giải:";
pub const RESTART: &str = "Làm bài khác";

pub const TIER_EXCELLENT: &str = "Xuất sắc! Con làm rất tốt! 🏆";
pub const TIER_GOOD: &str = "Làm tốt lắm! Cố gắng thêm chút nữa nhé. 👍";
pub const TIER_KEEP_PRACTICING: &str = "Không sao cả, luyện tập thêm sẽ giỏi hơn. 💪";
