use std::io;
use std::path::Path;

use chrono::Utc;

use crate::cache::CacheInvalidator;
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::ProductId;
use crate::files::FileStore;
use crate::forms::products::{CreateProductPayload, UpdateProductPayload};
use crate::repository::{ProductListQuery, ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

/// Number of products shown on the storefront home page.
const FEATURED_LIMIT: usize = 6;

/// A product file prepared for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn invalidate_listings<C: CacheInvalidator>(cache: &C) {
    cache.invalidate("/");
    cache.invalidate("/products");
}

/// Products shown on the home page: available ones, up to [`FEATURED_LIMIT`].
pub fn show_featured<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match repo.list_products(ProductListQuery::default().available().paginate(1, FEATURED_LIMIT)) {
        Ok((_total, products)) => Ok(products),
        Err(e) => {
            log::error!("Failed to list featured products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// All products available for purchase, for the customer catalog page.
pub fn show_catalog<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match repo.list_products(ProductListQuery::default().available()) {
        Ok((_total, products)) => Ok(products),
        Err(e) => {
            log::error!("Failed to list catalog products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Every product, available or not, for the admin product list.
pub fn list_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match repo.list_products(ProductListQuery::default()) {
        Ok((_total, products)) => Ok(products),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch one product for the admin edit page.
pub fn get_product<R>(id: ProductId, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    match repo.get_product_by_id(id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Store both blobs, insert the row and invalidate the listing pages.
///
/// Blob and row writes are not transactional: a failure after the first
/// write leaves an orphaned blob behind.
pub fn create_product<R, C>(
    payload: CreateProductPayload,
    repo: &R,
    files: &FileStore,
    cache: &C,
) -> ServiceResult<()>
where
    R: ProductWriter,
    C: CacheInvalidator,
{
    let file_path = match files.save_file(&payload.file.file_name, &payload.file.bytes) {
        Ok(path) => path,
        Err(e) => {
            log::error!("Failed to store product file: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let image_path = match files.save_image(&payload.image.file_name, &payload.image.bytes) {
        Ok(path) => path,
        Err(e) => {
            log::error!("Failed to store product image: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let now = Utc::now().naive_utc();
    let product = NewProduct {
        name: payload.name,
        description: payload.description,
        price_in_cents: payload.price_in_cents,
        file_path,
        image_path,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = repo.create_product(&product) {
        log::error!("Failed to create product: {e}");
        return Err(ServiceError::Internal);
    }

    invalidate_listings(cache);
    Ok(())
}

/// Overwrite a product's fields, replacing blobs only when new ones were
/// uploaded. The replaced blob is deleted before the new one is written.
pub fn update_product<R, C>(
    id: ProductId,
    payload: UpdateProductPayload,
    repo: &R,
    files: &FileStore,
    cache: &C,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
    C: CacheInvalidator,
{
    let product = match repo.get_product_by_id(id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut file_path = product.file_path;
    let mut image_path = product.image_path;

    if let Some(file) = payload.file {
        if let Err(e) = files.remove_file(&file_path) {
            log::error!("Failed to remove replaced product file: {e}");
            return Err(ServiceError::Internal);
        }
        file_path = match files.save_file(&file.file_name, &file.bytes) {
            Ok(path) => path,
            Err(e) => {
                log::error!("Failed to store replacement product file: {e}");
                return Err(ServiceError::Internal);
            }
        };
    }

    if let Some(image) = payload.image {
        if let Err(e) = files.remove_image(&image_path) {
            log::error!("Failed to remove replaced product image: {e}");
            return Err(ServiceError::Internal);
        }
        image_path = match files.save_image(&image.file_name, &image.bytes) {
            Ok(path) => path,
            Err(e) => {
                log::error!("Failed to store replacement product image: {e}");
                return Err(ServiceError::Internal);
            }
        };
    }

    let update = ProductUpdate {
        name: payload.name,
        description: payload.description,
        price_in_cents: payload.price_in_cents,
        file_path,
        image_path,
    };

    if let Err(e) = repo.update_product(id, &update) {
        log::error!("Failed to update product: {e}");
        return Err(ServiceError::Internal);
    }

    invalidate_listings(cache);
    Ok(())
}

/// Set the availability flag of a product.
pub fn toggle_product_availability<R, C>(
    id: ProductId,
    available: bool,
    repo: &R,
    cache: &C,
) -> ServiceResult<()>
where
    R: ProductWriter,
    C: CacheInvalidator,
{
    if let Err(e) = repo.set_product_availability(id, available) {
        log::error!("Failed to set product availability: {e}");
        return Err(ServiceError::Internal);
    }

    invalidate_listings(cache);
    Ok(())
}

/// Delete the row, then both blobs.
pub fn delete_product<R, C>(
    id: ProductId,
    repo: &R,
    files: &FileStore,
    cache: &C,
) -> ServiceResult<()>
where
    R: ProductWriter,
    C: CacheInvalidator,
{
    let product = match repo.delete_product(id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if let Err(e) = files.remove_file(&product.file_path) {
        log::error!("Failed to remove deleted product file: {e}");
        return Err(ServiceError::Internal);
    }
    if let Err(e) = files.remove_image(&product.image_path) {
        log::error!("Failed to remove deleted product image: {e}");
        return Err(ServiceError::Internal);
    }

    invalidate_listings(cache);
    Ok(())
}

/// Read a product's file for the admin download link.
pub fn download_product_file<R>(
    id: ProductId,
    repo: &R,
    files: &FileStore,
) -> ServiceResult<DownloadFile>
where
    R: ProductReader,
{
    let product = match repo.get_product_by_id(id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let bytes = match files.read_file(&product.file_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to read product file: {e}");
            return Err(ServiceError::Internal);
        }
    };

    // Download under the product name, keeping the stored extension.
    let file_name = match Path::new(&product.file_path)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) => format!("{}.{extension}", product.name),
        None => product.name,
    };

    Ok(DownloadFile { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use parking_lot::Mutex;

    use super::*;
    use crate::forms::products::UploadedBlob;
    use crate::repository::test::TestRepository;

    #[derive(Default)]
    struct RecordingCache {
        invalidated: Mutex<Vec<String>>,
    }

    impl CacheInvalidator for RecordingCache {
        fn invalidate(&self, path: &str) {
            self.invalidated.lock().push(path.to_string());
        }
    }

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("files"), dir.path().join("public"));
        (dir, store)
    }

    fn blob(file_name: &str, bytes: &[u8]) -> UploadedBlob {
        UploadedBlob {
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    fn widget_payload() -> CreateProductPayload {
        CreateProductPayload {
            name: "Widget".to_string(),
            description: "A fine widget".to_string(),
            price_in_cents: 500.try_into().expect("valid price"),
            file: blob("guide.pdf", b"file bytes"),
            image: blob("cover.png", b"image bytes"),
        }
    }

    fn count_entries(dir: &Path) -> usize {
        fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    fn sole_product(repo: &TestRepository) -> Product {
        let (_total, products) = repo
            .list_products(ProductListQuery::default())
            .expect("list products");
        assert_eq!(products.len(), 1);
        products.into_iter().next().expect("one product")
    }

    #[test]
    fn create_round_trips_blobs_and_starts_unavailable() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();

        create_product(widget_payload(), &repo, &files, &cache).expect("create");

        let product = sole_product(&repo);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price_in_cents.get(), 500);
        assert!(!product.is_available_for_purchase);

        assert_eq!(files.read_file(&product.file_path).expect("file"), b"file bytes");
        let image_on_disk = files
            .image_serve_root()
            .join(product.image_path.trim_start_matches("/products/"));
        assert_eq!(fs::read(image_on_disk).expect("image"), b"image bytes");

        assert_eq!(*cache.invalidated.lock(), vec!["/", "/products"]);
    }

    #[test]
    fn update_without_uploads_keeps_blobs_untouched() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();
        create_product(widget_payload(), &repo, &files, &cache).expect("create");
        let before = sole_product(&repo);

        let payload = UpdateProductPayload {
            name: "Widget II".to_string(),
            description: "Improved".to_string(),
            price_in_cents: 900.try_into().expect("valid price"),
            file: None,
            image: None,
        };
        update_product(before.id, payload, &repo, &files, &cache).expect("update");

        let after = sole_product(&repo);
        assert_eq!(after.name, "Widget II");
        assert_eq!(after.price_in_cents.get(), 900);
        assert_eq!(after.file_path, before.file_path);
        assert_eq!(after.image_path, before.image_path);
        assert_eq!(
            files.read_file(&after.file_path).expect("file"),
            b"file bytes"
        );
    }

    #[test]
    fn update_with_new_file_replaces_exactly_one_blob() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();
        create_product(widget_payload(), &repo, &files, &cache).expect("create");
        let before = sole_product(&repo);
        let files_dir = Path::new(&before.file_path)
            .parent()
            .expect("files dir")
            .to_path_buf();

        let payload = UpdateProductPayload {
            name: before.name.clone(),
            description: before.description.clone(),
            price_in_cents: before.price_in_cents,
            file: Some(blob("guide-v2.pdf", b"new file bytes")),
            image: None,
        };
        update_product(before.id, payload, &repo, &files, &cache).expect("update");

        let after = sole_product(&repo);
        assert_ne!(after.file_path, before.file_path);
        assert!(files.read_file(&before.file_path).is_err());
        assert_eq!(
            files.read_file(&after.file_path).expect("file"),
            b"new file bytes"
        );
        assert_eq!(count_entries(&files_dir), 1);
        assert_eq!(after.image_path, before.image_path);
    }

    #[test]
    fn update_of_missing_product_is_not_found() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();

        let payload = UpdateProductPayload {
            name: "Ghost".to_string(),
            description: String::new(),
            price_in_cents: 100.try_into().expect("valid price"),
            file: None,
            image: None,
        };
        let err = update_product(
            99.try_into().expect("valid id"),
            payload,
            &repo,
            &files,
            &cache,
        )
        .expect_err("missing product");
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn delete_removes_row_and_both_blobs() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();
        create_product(widget_payload(), &repo, &files, &cache).expect("create");
        let product = sole_product(&repo);

        delete_product(product.id, &repo, &files, &cache).expect("delete");

        assert!(repo.get_product_by_id(product.id).expect("get").is_none());
        assert!(files.read_file(&product.file_path).is_err());
        assert!(files.remove_image(&product.image_path).is_err());
        assert_eq!(count_entries(&files.image_serve_root()), 0);

        let err = delete_product(product.id, &repo, &files, &cache).expect_err("already gone");
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn toggling_availability_twice_is_an_involution() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();
        create_product(widget_payload(), &repo, &files, &cache).expect("create");
        let product = sole_product(&repo);
        assert!(!product.is_available_for_purchase);

        toggle_product_availability(product.id, true, &repo, &cache).expect("toggle on");
        assert!(sole_product(&repo).is_available_for_purchase);

        toggle_product_availability(product.id, false, &repo, &cache).expect("toggle off");
        assert!(!sole_product(&repo).is_available_for_purchase);
    }

    #[test]
    fn catalog_hides_unavailable_products() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();
        create_product(widget_payload(), &repo, &files, &cache).expect("create");
        let product = sole_product(&repo);

        assert!(show_catalog(&repo).expect("catalog").is_empty());

        toggle_product_availability(product.id, true, &repo, &cache).expect("toggle");
        assert_eq!(show_catalog(&repo).expect("catalog").len(), 1);
    }

    #[test]
    fn download_uses_product_name_with_stored_extension() {
        let repo = TestRepository::new();
        let (_dir, files) = store();
        let cache = RecordingCache::default();
        create_product(widget_payload(), &repo, &files, &cache).expect("create");
        let product = sole_product(&repo);

        let download = download_product_file(product.id, &repo, &files).expect("download");
        assert_eq!(download.file_name, "Widget.pdf");
        assert_eq!(download.bytes, b"file bytes");
    }
}
