//! One-shot seeding of the snippet collection with built-in examples.

use tracing::{debug, info};

use crate::SnippetStore;
use crate::errors::StoreError;
use crate::record::Document;

pub const HTML_TAILWIND_ID: &str = "doc-html-tailwind";
pub const JS_FETCH_ID: &str = "doc-js-fetch";
pub const PYTHON_FASTAPI_ID: &str = "doc-python-fastapi";

/// What [`ensure_seeded`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held documents; nothing was written.
    AlreadyPopulated { existing: u64 },
    /// The store was empty and the built-in documents were inserted.
    Seeded { inserted: usize },
}

/// The three built-in example documents, in insertion order.
pub fn seed_documents() -> Vec<Document> {
    vec![
        Document::new(HTML_TAILWIND_ID, HTML_TAILWIND_TEXT)
            .with_meta("lang", "html")
            .with_meta("description", "Basic Tailwind HTML page template"),
        Document::new(JS_FETCH_ID, JS_FETCH_TEXT)
            .with_meta("lang", "javascript")
            .with_meta("description", "JS fetch example for POST API"),
        Document::new(PYTHON_FASTAPI_ID, PYTHON_FASTAPI_TEXT)
            .with_meta("lang", "python")
            .with_meta("description", "Simple FastAPI example"),
    ]
}

/// Inserts [`seed_documents`] when the store is empty; otherwise does nothing.
///
/// Store failures are returned as-is.
pub async fn ensure_seeded(store: &dyn SnippetStore) -> Result<SeedOutcome, StoreError> {
    let existing = store.count().await?;
    if existing > 0 {
        debug!(existing, "snippet store already populated, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated { existing });
    }

    let docs = seed_documents();
    let inserted = store.upsert(&docs).await?;
    info!(inserted, "snippet store seeded with built-in examples");
    Ok(SeedOutcome::Seeded { inserted })
}

const HTML_TAILWIND_TEXT: &str = r##"Basic Tailwind HTML page:
<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Address Form</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <!-- Tailwind CDN -->
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen bg-slate-100 flex items-center justify-center p-4">
  <div class="w-full max-w-xl bg-white shadow-lg rounded-2xl p-8">
    <h1 class="text-2xl font-bold text-slate-800 mb-2">Address Form</h1>
    <p class="text-slate-500 mb-6 text-sm">
      Enter your address information and submit.
    </p>

    <!-- Alert / Status -->
    <div id="statusBox" class="hidden mb-4 text-sm rounded-md px-3 py-2"></div>

    <form id="addressForm" class="space-y-4">
      <!-- Name -->
      <div>
        <label for="fullName" class="block text-sm font-medium text-slate-700 mb-1">
          Full Name
        </label>
        <input
          id="fullName"
          name="fullName"
          type="text"
          required
          class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
          placeholder="Jane Doe"
        />
      </div>

      <!-- Street -->
      <div>
        <label for="street" class="block text-sm font-medium text-slate-700 mb-1">
          Street Address
        </label>
        <input
          id="street"
          name="street"
          type="text"
          required
          class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
          placeholder="123 Main St"
        />
      </div>

      <!-- City / State / Zip -->
      <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
        <div>
          <label for="city" class="block text-sm font-medium text-slate-700 mb-1">
            City
          </label>
          <input
            id="city"
            name="city"
            type="text"
            required
            class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
            placeholder="Montgomery"
          />
        </div>
        <div>
          <label for="state" class="block text-sm font-medium text-slate-700 mb-1">
            State / Province
          </label>
          <input
            id="state"
            name="state"
            type="text"
            required
            class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
            placeholder="AL"
          />
        </div>
        <div>
          <label for="postalCode" class="block text-sm font-medium text-slate-700 mb-1">
            ZIP / Postal Code
          </label>
          <input
            id="postalCode"
            name="postalCode"
            type="text"
            required
            class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
            placeholder="36104"
          />
        </div>
      </div>

      <!-- Country -->
      <div>
        <label for="country" class="block text-sm font-medium text-slate-700 mb-1">
          Country
        </label>
        <input
          id="country"
          name="country"
          type="text"
          required
          class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
          placeholder="United States"
        />
      </div>

      <!-- Optional Email -->
      <div>
        <label for="email" class="block text-sm font-medium text-slate-700 mb-1">
          Email (optional)
        </label>
        <input
          id="email"
          name="email"
          type="email"
          class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500"
          placeholder="you@example.com"
        />
      </div>

      <!-- Submit -->
      <div class="pt-2 flex items-center gap-3">
        <button
          type="submit"
          id="submitBtn"
          class="inline-flex items-center justify-center rounded-lg bg-indigo-600 px-4 py-2 text-sm font-semibold text-white shadow hover:bg-indigo-700 focus:outline-none focus:ring-2 focus:ring-indigo-500 disabled:opacity-60 disabled:cursor-not-allowed"
        >
          Submit Address
        </button>
        <span id="loadingText" class="hidden text-xs text-slate-500">
          Sending...
        </span>
      </div>
    </form>
  </div>

  <script>
    const form = document.getElementById('addressForm');
    const statusBox = document.getElementById('statusBox');
    const submitBtn = document.getElementById('submitBtn');
    const loadingText = document.getElementById('loadingText');

    function setStatus(message, type = 'success') {
      statusBox.textContent = message;
      statusBox.classList.remove('hidden');
      statusBox.classList.remove(
        'bg-red-100',
        'text-red-700',
        'border-red-300',
        'bg-green-100',
        'text-green-700',
        'border-green-300'
      );

      if (type === 'error') {
        statusBox.classList.add('bg-red-100', 'text-red-700', 'border', 'border-red-300');
      } else {
        statusBox.classList.add('bg-green-100', 'text-green-700', 'border', 'border-green-300');
      }
    }

    function setLoading(isLoading) {
      submitBtn.disabled = isLoading;
      loadingText.classList.toggle('hidden', !isLoading);
    }

    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      setLoading(true);
      statusBox.classList.add('hidden');

      const data = {
        fullName: form.fullName.value.trim(),
        street: form.street.value.trim(),
        city: form.city.value.trim(),
        state: form.state.value.trim(),
        postalCode: form.postalCode.value.trim(),
        country: form.country.value.trim(),
        email: form.email.value.trim() || null,
      };

      try {
        const response = await fetch('/api/address', {
          method: 'POST',
          headers: {
            'Content-Type': 'application/json',
          },
          body: JSON.stringify(data),
        });

        if (!response.ok) {
          const errText = await response.text();
          throw new Error(errText || 'Failed to submit address');
        }

        setStatus('Address submitted successfully!', 'success');
        form.reset();
      } catch (err) {
        console.error(err);
        setStatus('Error: ' + err.message, 'error');
      } finally {
        setLoading(false);
      }
    });
  </script>
</body>
</html>

"##;

const JS_FETCH_TEXT: &str = r##"Simple JavaScript fetch POST example:

async function callApi() {
  const response = await fetch('http://localhost:8000/api/generate', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({
      prompt: 'Create a simple Node.js Express server',
      code_type: 'node'
    })
  });
  const data = await response.json();
  console.log(data);
}
"##;

const PYTHON_FASTAPI_TEXT: &str = r##"Python FastAPI sample:

from fastapi import FastAPI

app = FastAPI()

@app.get("/hello")
def hello():
    return {"message": "Hello World"}
"##;

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::record::SnippetHit;

    /// Keyed by id like the real store, so upserts replace.
    #[derive(Default)]
    struct MemoryStore {
        docs: Mutex<Vec<Document>>,
        upserts: AtomicUsize,
    }

    impl SnippetStore for MemoryStore {
        fn count(&self) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + '_>> {
            Box::pin(async move { Ok(self.docs.lock().unwrap().len() as u64) })
        }

        fn upsert<'a>(
            &'a self,
            docs: &'a [Document],
        ) -> Pin<Box<dyn Future<Output = Result<usize, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                self.upserts.fetch_add(1, Ordering::SeqCst);
                let mut stored = self.docs.lock().unwrap();
                for doc in docs {
                    stored.retain(|d| d.id != doc.id);
                    stored.push(doc.clone());
                }
                Ok(docs.len())
            })
        }

        fn query<'a>(
            &'a self,
            _text: &'a str,
            n_results: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<SnippetHit>, StoreError>> + Send + 'a>>
        {
            Box::pin(async move {
                Ok(self
                    .docs
                    .lock()
                    .unwrap()
                    .iter()
                    .take(n_results as usize)
                    .map(|d| SnippetHit {
                        id: d.id.clone(),
                        text: d.text.clone(),
                        score: 1.0,
                        metadata: d.metadata.clone(),
                    })
                    .collect())
            })
        }
    }

    struct BrokenStore;

    impl SnippetStore for BrokenStore {
        fn count(&self) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + '_>> {
            Box::pin(async { Err(StoreError::Qdrant("connection refused".into())) })
        }

        fn upsert<'a>(
            &'a self,
            _docs: &'a [Document],
        ) -> Pin<Box<dyn Future<Output = Result<usize, StoreError>> + Send + 'a>> {
            Box::pin(async { Err(StoreError::Qdrant("upsert after failed count".into())) })
        }

        fn query<'a>(
            &'a self,
            _text: &'a str,
            _n_results: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<SnippetHit>, StoreError>> + Send + 'a>>
        {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[test]
    fn seed_documents_have_fixed_ids_and_tags() {
        let docs = seed_documents();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, [HTML_TAILWIND_ID, JS_FETCH_ID, PYTHON_FASTAPI_ID]);

        let langs: Vec<&str> = docs.iter().map(|d| d.metadata["lang"].as_str()).collect();
        assert_eq!(langs, ["html", "javascript", "python"]);

        assert!(docs[0].text.starts_with("Basic Tailwind HTML page:\n<!DOCTYPE html>"));
        assert!(docs[1].text.contains("fetch('http://localhost:8000/api/generate'"));
        assert!(docs[2].text.starts_with("Python FastAPI sample:"));
    }

    #[tokio::test]
    async fn seeds_empty_store() {
        let store = MemoryStore::default();
        let outcome = ensure_seeded(&store).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Seeded { inserted: 3 });
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn seeding_twice_is_a_noop() {
        let store = MemoryStore::default();
        ensure_seeded(&store).await.unwrap();
        let second = ensure_seeded(&store).await.unwrap();

        assert_eq!(second, SeedOutcome::AlreadyPopulated { existing: 3 });
        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.upserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn populated_store_is_left_untouched() {
        let store = MemoryStore::default();
        store
            .upsert(&[Document::new("user-doc", "println!(\"hi\")")])
            .await
            .unwrap();

        let outcome = ensure_seeded(&store).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadyPopulated { existing: 1 });
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let err = ensure_seeded(&BrokenStore).await.unwrap_err();
        assert!(matches!(err, StoreError::Qdrant(_)));
    }
}
