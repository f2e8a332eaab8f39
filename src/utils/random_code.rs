use rand::Rng;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 自动文档 ID 长度
pub const AUTO_ID_LENGTH: usize = 20;

/// 生成随机文档 ID（20 位字母数字）
pub fn generate_document_id() -> String {
    let mut rng = rand::rng();
    (0..AUTO_ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ID_CHARSET.len());
            ID_CHARSET[idx] as char
        })
        .collect()
}
