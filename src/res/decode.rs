use crate::errors::*;
use crate::resource::prelude::*;

use super::url::Url;

/// Decodes fetched bytes into a resource, picked by the extension of `url`.
/// Unknown extensions are kept as raw `Bytes`.
pub fn decode(url: &Url, bytes: Vec<u8>) -> Result<Value> {
    let ext = url.extension().unwrap_or_default();
    let value = match ext.as_str() {
        "png" | "jpg" | "jpeg" => Value::new(Image::decode(&bytes)?.with_src(url.to_string())),
        "json" => Value::new(Json::parse(&bytes)?),
        "txt" | "csv" | "xml" | "html" | "glsl" | "vs" | "fs" => {
            let text = String::from_utf8(bytes)
                .map_err(|err| Error::Malformed(format!("{} is not utf-8: {}", url, err)))?;
            Value::new(Text::new(text))
        }
        _ => Value::new(Bytes::new(bytes)),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_extension() {
        let url = Url::new("mem://a.json").unwrap();
        let v = decode(&url, br#"{"a": 1}"#.to_vec()).unwrap();
        assert!(v.resource::<Json>().is_some());

        let url = Url::new("mem://a.txt").unwrap();
        let v = decode(&url, b"hello".to_vec()).unwrap();
        assert_eq!(v.resource::<Text>().and_then(|t| t.text()), Some("hello".into()));

        let url = Url::new("mem://a.bin").unwrap();
        let v = decode(&url, vec![0, 1]).unwrap();
        assert_eq!(v.resource::<Bytes>().map(|b| b.len()), Some(2));

        let url = Url::new("mem://a.png").unwrap();
        assert!(decode(&url, vec![0, 1]).is_err());
    }
}
