//! Dependency injection using Shaku.
//!
//! - `FolioModule`: MySQL repositories (users included), Redis cache and
//!   the shared revocation ledger.
//! - `LocalModule`: in-process stores for development and tests.
//!
//! The services themselves own read-through accessors built from the
//! resolved components, so they are assembled by [`Services::from_module`]
//! rather than registered as components.

use crate::auth_service::{AuthService, AuthServiceImpl};
use crate::editor_service::{EditorService, EditorServiceImpl};
use crate::gallery_service::{GalleryService, GalleryServiceImpl};
use crate::reader_service::{ReaderService, ReaderServiceImpl};
use crate::settings::CacheSettings;
use crate::upload_service::{UploadService, UploadServiceImpl};
use folio_cache::{
    create_redis_pool, CacheInterface, InMemoryCache, InMemoryRevocationLedger, KeySpace,
    RedisCacheService, RedisCacheServiceParameters, RevocationLedger, SharedRevocationLedger,
    SharedRevocationLedgerParameters,
};
use folio_config::AppConfig;
use folio_core::{module, FolioResult, HasComponent};
use folio_repository::{
    ArticleRepository, BlobRepository, DatabasePool, DatabasePoolInterface,
    DatabasePoolParameters, InMemoryArticleRepository, InMemoryBlobRepository,
    InMemoryPhotoRepository, InMemoryRevisionRepository, InMemoryUserRepository,
    MySqlArticleRepository, MySqlPhotoRepository, MySqlRevisionRepository, MySqlUserRepository,
    PhotoRepository, RevisionRepository, UserRepository,
};
use folio_security::TokenProvider;
use std::sync::Arc;
use tracing::info;

// Production module: MySQL document store, Redis shared cache, and a
// revocation ledger stored in that cache.
module! {
    pub FolioModule {
        components = [
            DatabasePool,
            MySqlPhotoRepository,
            MySqlArticleRepository,
            MySqlRevisionRepository,
            MySqlUserRepository,
            RedisCacheService,
            SharedRevocationLedger,
        ],
        providers = [],
    }
}

// Single-process module with no external stores.
module! {
    pub LocalModule {
        components = [
            InMemoryPhotoRepository,
            InMemoryArticleRepository,
            InMemoryRevisionRepository,
            InMemoryUserRepository,
            InMemoryBlobRepository,
            InMemoryCache,
            InMemoryRevocationLedger,
        ],
        providers = [],
    }
}

/// Builds the production module.
pub async fn build_folio_module(config: &AppConfig) -> FolioResult<Arc<FolioModule>> {
    let db_pool = DatabasePool::connect(&config.database).await?;
    let cache_pool = create_redis_pool(&config.redis)?;

    let module = FolioModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
        })
        .with_component_parameters::<SharedRevocationLedger>(SharedRevocationLedgerParameters {
            keys: KeySpace::from_config(&config.cache),
            local: InMemoryRevocationLedger::new(),
        })
        .build();

    info!("Folio module built");
    Ok(Arc::new(module))
}

/// Builds the in-process module.
#[must_use]
pub fn build_local_module() -> Arc<LocalModule> {
    Arc::new(LocalModule::builder().build())
}

/// The application services, wired to one module's components.
#[derive(Clone)]
pub struct Services {
    pub gallery: Arc<dyn GalleryService>,
    pub reader: Arc<dyn ReaderService>,
    pub editor: Arc<dyn EditorService>,
    pub uploads: Arc<dyn UploadService>,
    pub auth: Arc<dyn AuthService>,
}

impl Services {
    /// Assembles the services from a module's stores.
    ///
    /// Blob storage is passed in separately; the production module does not
    /// ship one.
    pub fn from_module<M>(module: &M, blobs: Arc<dyn BlobRepository>, config: &AppConfig) -> Self
    where
        M: HasComponent<dyn PhotoRepository>
            + HasComponent<dyn ArticleRepository>
            + HasComponent<dyn RevisionRepository>
            + HasComponent<dyn UserRepository>
            + HasComponent<dyn CacheInterface>
            + HasComponent<dyn RevocationLedger>,
    {
        let photos = <M as HasComponent<dyn PhotoRepository>>::resolve(module);
        let articles = <M as HasComponent<dyn ArticleRepository>>::resolve(module);
        let revisions = <M as HasComponent<dyn RevisionRepository>>::resolve(module);
        let users = <M as HasComponent<dyn UserRepository>>::resolve(module);
        let cache = <M as HasComponent<dyn CacheInterface>>::resolve(module);
        let ledger = <M as HasComponent<dyn RevocationLedger>>::resolve(module);

        let settings = CacheSettings::from_config(&config.cache);
        let token_provider = Arc::new(TokenProvider::new(
            Arc::new(config.security.clone()),
            ledger,
        ));

        Self {
            gallery: Arc::new(GalleryServiceImpl::new(
                Arc::clone(&photos),
                Arc::clone(&cache),
                &settings,
            )),
            reader: Arc::new(ReaderServiceImpl::new(
                Arc::clone(&articles),
                Arc::clone(&revisions),
                Arc::clone(&cache),
                &settings,
            )),
            editor: Arc::new(EditorServiceImpl::new(
                articles,
                revisions,
                Arc::clone(&cache),
                settings.keys.clone(),
            )),
            uploads: Arc::new(UploadServiceImpl::new(
                photos,
                blobs,
                cache,
                settings.keys.clone(),
            )),
            auth: Arc::new(AuthServiceImpl::new(token_provider, users)),
        }
    }

    /// Services over a fresh [`LocalModule`].
    #[must_use]
    pub fn local(config: &AppConfig) -> Self {
        let module = build_local_module();
        let blobs: Arc<dyn BlobRepository> = module.resolve();
        Self::from_module(module.as_ref(), blobs, config)
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
