//! Common test utilities and helpers for the storefront photo tests
//!
//! This module provides fixture images and a scripted codec so the pipeline
//! can be exercised without depending on real encoder output sizes.

#![allow(dead_code)]

/// Fixture image generation
pub mod fixtures {
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;
    use storefront_photos::RawSelection;

    fn encode(image: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).expect("encode fixture");
        out.into_inner()
    }

    /// Smooth RGB gradient PNG, compresses well as JPEG
    pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ])
        });
        encode(image.into(), ImageFormat::Png)
    }

    /// Fully transparent RGBA PNG
    pub fn transparent_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        encode(image.into(), ImageFormat::Png)
    }

    /// Pseudo-random noise PNG, compresses badly as JPEG
    pub fn noise_png(width: u32, height: u32, seed: u32) -> Vec<u8> {
        let mut state = seed.wrapping_mul(2_654_435_761).max(1);
        let image = RgbImage::from_fn(width, height, |_, _| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [a, b, c, _] = state.to_le_bytes();
            Rgb([a, b, c])
        });
        encode(image.into(), ImageFormat::Png)
    }

    pub fn png_selection(bytes: Vec<u8>) -> RawSelection {
        RawSelection::new(bytes, "image/png")
    }
}

/// Scripted codec for exact pipeline assertions
pub mod scripted {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use storefront_photos::{ImageCodec, PhotoError, PhotoResult, PixelBuffer};

    pub const HEIGHT: u32 = 2;

    /// Codec whose decoded width is the payload length (height fixed to
    /// [`HEIGHT`]) and whose encoded size per quality comes from a script.
    ///
    /// Encoded bytes start with the canvas width (little endian) so tests can
    /// tell images apart after they pass through the slot set.
    #[derive(Clone)]
    pub struct ScriptedCodec {
        sizes: Arc<dyn Fn(u8) -> usize + Send + Sync>,
        pub decodes: Arc<AtomicUsize>,
        pub qualities: Arc<Mutex<Vec<u8>>>,
        pub fail_encode: bool,
    }

    impl ScriptedCodec {
        pub fn new(sizes: impl Fn(u8) -> usize + Send + Sync + 'static) -> Self {
            Self {
                sizes: Arc::new(sizes),
                decodes: Arc::new(AtomicUsize::new(0)),
                qualities: Arc::new(Mutex::new(Vec::new())),
                fail_encode: false,
            }
        }

        /// Every encoding is 1 KiB
        pub fn small() -> Self {
            Self::new(|_| 1024)
        }

        pub fn decode_count(&self) -> usize {
            self.decodes.load(Ordering::SeqCst)
        }

        pub fn encoded_qualities(&self) -> Vec<u8> {
            self.qualities.lock().unwrap().clone()
        }
    }

    impl std::fmt::Debug for ScriptedCodec {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ScriptedCodec")
                .field("decodes", &self.decodes)
                .field("qualities", &self.qualities)
                .field("fail_encode", &self.fail_encode)
                .finish_non_exhaustive()
        }
    }

    impl ImageCodec for ScriptedCodec {
        fn decode_image(&self, bytes: &[u8]) -> PhotoResult<PixelBuffer> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            if bytes.is_empty() {
                return Err(PhotoError::decode("empty payload"));
            }
            Ok(PixelBuffer::filled(bytes.len() as u32, HEIGHT, [0, 0, 0, 0]))
        }

        fn composite_over_white(
            &self,
            _pixels: &PixelBuffer,
            width: u32,
            height: u32,
        ) -> PhotoResult<PixelBuffer> {
            Ok(PixelBuffer::filled(width, height, [255, 255, 255, 255]))
        }

        fn encode_jpeg(&self, pixels: &PixelBuffer, quality: u8) -> PhotoResult<Vec<u8>> {
            self.qualities.lock().unwrap().push(quality);
            if self.fail_encode {
                return Err(PhotoError::encode("scripted failure"));
            }
            let mut out = pixels.width().to_le_bytes().to_vec();
            out.resize((self.sizes)(quality).max(4), 0);
            Ok(out)
        }
    }

    /// Width tag written by [`ScriptedCodec::encode_jpeg`]
    pub fn width_tag(encoded: &[u8]) -> u32 {
        u32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]])
    }

    /// Selection that the scripted codec decodes to `width` x [`HEIGHT`]
    pub fn selection_of_width(width: usize) -> storefront_photos::RawSelection {
        storefront_photos::RawSelection::new(vec![1u8; width], "image/png")
    }
}

/// One-shot HTTP server for exercising the product API client
pub mod http {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, answer with `status` and `body`, return the raw request.
    pub async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 8192];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/api", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= head_end + 4 + content_length
    }
}
